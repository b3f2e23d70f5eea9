//! Retained scene graph shared by the host, the verses and the renderer
//!
//! Verses add drawables during `init` and mutate them every frame. Geometry
//! attribute arrays are sized once at construction; afterwards they are only
//! reachable as slices, so their length never changes.

use crate::color::Rgba;
use glam::{Mat4, Quat, Vec3};

/// Handle to an object in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(u32);

/// How a geometry's vertices are assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Camera-facing round points, one per vertex
    Points,
    /// Line segments between indexed vertex pairs
    Lines,
}

/// Vertex buffers for one drawable
#[derive(Debug, Clone)]
pub struct Geometry {
    primitive: Primitive,
    positions: Vec<Vec3>,
    colors: Vec<Rgba>,
    sizes: Vec<f32>,
    edges: Vec<[u32; 2]>,
}

impl Geometry {
    /// `count` points at the origin, all with `color` and `size`
    pub fn points(count: usize, color: Rgba, size: f32) -> Self {
        Self {
            primitive: Primitive::Points,
            positions: vec![Vec3::ZERO; count],
            colors: vec![color; count],
            sizes: vec![size; count],
            edges: Vec::new(),
        }
    }

    /// Points at the given positions
    pub fn points_at(positions: Vec<Vec3>, color: Rgba, size: f32) -> Self {
        let n = positions.len();
        Self {
            primitive: Primitive::Points,
            positions,
            colors: vec![color; n],
            sizes: vec![size; n],
            edges: Vec::new(),
        }
    }

    /// Indexed line segments; edges referencing missing vertices are dropped
    pub fn lines(positions: Vec<Vec3>, edges: Vec<[u32; 2]>, color: Rgba) -> Self {
        let n = positions.len();
        let edges = edges
            .into_iter()
            .filter(|[a, b]| (*a as usize) < n && (*b as usize) < n)
            .collect();
        Self {
            primitive: Primitive::Lines,
            positions,
            colors: vec![color; n],
            sizes: vec![1.0; n],
            edges,
        }
    }

    /// Open polyline through `positions`
    pub fn line_strip(positions: Vec<Vec3>, color: Rgba) -> Self {
        let edges = (1..positions.len() as u32).map(|i| [i - 1, i]).collect();
        Self::lines(positions, edges, color)
    }

    /// Independent segments, consecutive position pairs
    pub fn segments(positions: Vec<Vec3>, color: Rgba) -> Self {
        let edges = (0..positions.len() as u32 / 2).map(|i| [2 * i, 2 * i + 1]).collect();
        Self::lines(positions, edges, color)
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut [Rgba] {
        &mut self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn sizes_mut(&mut self) -> &mut [f32] {
        &mut self.sizes
    }

    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    /// Paint every vertex one color
    pub fn fill_color(&mut self, color: Rgba) {
        self.colors.iter_mut().for_each(|c| *c = color);
    }
}

/// Uniform light; its intensity scales every drawable's brightness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub intensity: f32,
}

impl Light {
    pub fn ambient(intensity: f32) -> Self {
        Self { intensity }
    }
}

/// Object translation, rotation and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone)]
pub enum ObjectKind {
    Drawable(Geometry),
    Light(Light),
}

/// A named node in the scene
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub visible: bool,
    /// Multiplies every vertex alpha
    pub opacity: f32,
    pub transform: Transform,
    pub kind: ObjectKind,
}

impl SceneObject {
    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.kind {
            ObjectKind::Drawable(g) => Some(g),
            ObjectKind::Light(_) => None,
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, ObjectKind::Light(_))
    }
}

/// Flat list of objects in insertion (draw) order
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<(ObjectId, SceneObject)>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, name: &str, kind: ObjectKind) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push((
            id,
            SceneObject {
                name: name.to_string(),
                visible: true,
                opacity: 1.0,
                transform: Transform::IDENTITY,
                kind,
            },
        ));
        id
    }

    /// Add a drawable and return its handle
    pub fn add(&mut self, name: &str, geometry: Geometry) -> ObjectId {
        self.insert(name, ObjectKind::Drawable(geometry))
    }

    pub fn add_light(&mut self, name: &str, light: Light) -> ObjectId {
        self.insert(name, ObjectKind::Light(light))
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|(oid, _)| *oid == id).map(|(_, o)| o)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects
            .iter_mut()
            .find(|(oid, _)| *oid == id)
            .map(|(_, o)| o)
    }

    pub fn geometry_mut(&mut self, id: ObjectId) -> Option<&mut Geometry> {
        match self.get_mut(id).map(|o| &mut o.kind) {
            Some(ObjectKind::Drawable(g)) => Some(g),
            _ => None,
        }
    }

    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, o)| o.name == name)
            .map(|(id, _)| *id)
    }

    pub fn set_visible(&mut self, id: ObjectId, visible: bool) {
        if let Some(o) = self.get_mut(id) {
            o.visible = visible;
        }
    }

    pub fn is_visible(&self, id: ObjectId) -> bool {
        self.get(id).is_some_and(|o| o.visible)
    }

    pub fn set_opacity(&mut self, id: ObjectId, opacity: f32) {
        if let Some(o) = self.get_mut(id) {
            o.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    pub fn set_transform(&mut self, id: ObjectId, transform: Transform) {
        if let Some(o) = self.get_mut(id) {
            o.transform = transform;
        }
    }

    /// Remove every object except lights
    pub fn clear_non_lights(&mut self) {
        self.objects.retain(|(_, o)| o.is_light());
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().map(|(id, o)| (*id, o))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Total light intensity, used to scale drawable brightness
    pub fn illumination(&self) -> f32 {
        self.objects
            .iter()
            .filter_map(|(_, o)| match o.kind {
                ObjectKind::Light(light) => Some(light.intensity),
                ObjectKind::Drawable(_) => None,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WHITE;

    #[test]
    fn clearing_keeps_lights_only() {
        let mut scene = Scene::new();
        let light = scene.add_light("ambient", Light::ambient(1.0));
        scene.add("cloud", Geometry::points(10, WHITE, 0.1));
        scene.add("edges", Geometry::line_strip(vec![Vec3::ZERO, Vec3::X], WHITE));

        scene.clear_non_lights();

        assert_eq!(scene.len(), 1);
        assert!(scene.get(light).is_some());
        assert_eq!(scene.illumination(), 1.0);
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut scene = Scene::new();
        let first = scene.add("a", Geometry::points(1, WHITE, 0.1));
        scene.clear_non_lights();
        let second = scene.add("b", Geometry::points(1, WHITE, 0.1));
        assert_ne!(first, second);
        assert!(scene.get(first).is_none());
    }

    #[test]
    fn out_of_range_edges_are_dropped() {
        let g = Geometry::lines(vec![Vec3::ZERO, Vec3::X], vec![[0, 1], [1, 5]], WHITE);
        assert_eq!(g.edges(), &[[0, 1]]);
    }

    #[test]
    fn segments_pair_consecutive_vertices() {
        let g = Geometry::segments(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z], WHITE);
        assert_eq!(g.edges(), &[[0, 1], [2, 3]]);
        assert_eq!(g.primitive(), Primitive::Lines);
    }

    #[test]
    fn opacity_is_clamped() {
        let mut scene = Scene::new();
        let id = scene.add("a", Geometry::points(1, WHITE, 0.1));
        scene.set_opacity(id, 3.0);
        assert_eq!(scene.get(id).map(|o| o.opacity), Some(1.0));
    }
}
