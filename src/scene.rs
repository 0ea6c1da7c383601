use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::mesh::MeshKind;
use crate::transform::TransformSpec;

/// Declarative list of the objects drawn every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new(objects: Vec<SceneObject>) -> Self {
        Self { objects }
    }

    /// The tabletop still life: a table with a bowl, a microwave, an ice
    /// maker and a pitcher on top of it.
    pub fn still_life() -> Self {
        let table_height = 3.0;
        let leg_scale = Vec3::new(0.3, table_height, 0.3);
        let (table_width, table_depth) = (40.0, 20.0);
        let leg_x = table_width / 2.0 - leg_scale.x * 2.0;
        let leg_z = table_depth / 2.0 - leg_scale.z * 1.5;
        let legs = [
            ("rear-left leg", -leg_x, -leg_z),
            ("rear-right leg", leg_x, -leg_z),
            ("front-left leg", -leg_x, leg_z),
            ("front-right leg", leg_x, leg_z),
        ]
        .map(|(name, x, z)| {
            SceneObject::new(name, MeshKind::Cylinder)
                .scaled(leg_scale)
                .at(Vec3::new(x, -table_height, z))
                .textured("wood")
        });

        let red = Vec4::new(0.8, 0.1, 0.1, 1.0);
        let aqua = Vec4::new(0.4, 0.9, 0.9, 4.0);

        let mut objects = vec![SceneObject::new("tabletop", MeshKind::Box)
            .scaled(Vec3::new(table_width, 0.5, table_depth))
            .material("wood")
            .textured("marble")];
        // Legs only set a texture and inherit the tabletop's material.
        objects.extend(legs);
        objects.extend([
            SceneObject::new("bowl", MeshKind::Cylinder)
                .scaled(Vec3::new(1.5, 0.9, 1.5))
                .colored(Vec4::ONE)
                .material("plastic"),
            SceneObject::new("bowl rim", MeshKind::TaperedCylinder)
                .scaled(Vec3::new(2.0, 0.3, 2.0))
                .rotated(Vec3::new(180.0, 0.0, 0.0))
                .at(Vec3::new(0.0, 1.0, 0.0))
                .material("stone")
                .textured("marble"),
            SceneObject::new("microwave body", MeshKind::Box)
                .scaled(Vec3::new(9.5, 5.2, 5.5))
                .at(Vec3::new(10.0, 3.0, 0.0))
                .colored(Vec4::new(0.5, 0.5, 0.5, 1.0))
                .material("plastic"),
            SceneObject::new("microwave door", MeshKind::Box)
                .scaled(Vec3::new(9.5, 5.2, 0.1))
                .at(Vec3::new(10.0, 3.0, 2.8))
                .material("plastic")
                .textured("marble"),
            SceneObject::new("microwave panel", MeshKind::Box)
                .scaled(Vec3::new(0.3, 0.7, 1.5))
                .rotated(Vec3::new(0.0, 90.0, 0.0))
                .at(Vec3::new(13.2, 1.3, 2.85))
                .material("plastic")
                .textured("wood"),
            SceneObject::new("ice maker body", MeshKind::Box)
                .scaled(Vec3::new(4.5, 5.0, 4.2))
                .at(Vec3::new(-5.0, 2.7, 0.0))
                .colored(red)
                .material("plastic"),
            SceneObject::new("ice maker front", MeshKind::Cylinder)
                .scaled(Vec3::new(2.27, 5.0, 1.8))
                .at(Vec3::new(-5.0, 0.2, 1.96))
                .colored(red)
                .material("plastic"),
            SceneObject::new("pitcher", MeshKind::Cylinder)
                .scaled(Vec3::new(1.0, 2.5, 1.0))
                .at(Vec3::new(1.5, 0.0, -4.0))
                .colored(aqua)
                .material("plastic"),
            SceneObject::new("pitcher spout", MeshKind::Cylinder)
                .scaled(Vec3::new(0.2, 0.3, 0.3))
                .rotated(Vec3::new(45.0, 0.0, 0.0))
                .at(Vec3::new(1.5, 1.9, -3.2))
                .colored(aqua)
                .material("plastic"),
        ]);
        Self { objects }
    }
}

/// One draw: mesh, placement and the optional shading overrides applied
/// before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub mesh: MeshKind,
    #[serde(default)]
    pub transform: TransformSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Vec4>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv_scale: Option<Vec2>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, mesh: MeshKind) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform: TransformSpec::default(),
            color: None,
            material: None,
            texture: None,
            uv_scale: None,
        }
    }

    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn rotated(mut self, degrees: Vec3) -> Self {
        self.transform.rotation_degrees = degrees;
        self
    }

    pub fn at(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn colored(mut self, color: Vec4) -> Self {
        self.color = Some(color);
        self
    }

    pub fn material(mut self, tag: impl Into<String>) -> Self {
        self.material = Some(tag.into());
        self
    }

    pub fn textured(mut self, tag: impl Into<String>) -> Self {
        self.texture = Some(tag.into());
        self
    }

    pub fn uv_scaled(mut self, scale: Vec2) -> Self {
        self.uv_scale = Some(scale);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_life_has_every_piece() {
        let scene = Scene::still_life();
        assert_eq!(scene.objects.len(), 14);
        assert_eq!(scene.objects[0].name, "tabletop");
    }

    #[test]
    fn legs_sit_inside_the_table_corners() {
        let scene = Scene::still_life();
        let legs: Vec<_> = scene
            .objects
            .iter()
            .filter(|o| o.name.ends_with("leg"))
            .collect();
        assert_eq!(legs.len(), 4);
        for leg in legs {
            let t = leg.transform.translation;
            assert!((t.x.abs() - 19.4).abs() < 1e-4);
            assert!((t.z.abs() - 9.55).abs() < 1e-4);
            assert_eq!(t.y, -3.0);
            assert!(leg.material.is_none());
        }
    }

    #[test]
    fn builder_fills_optional_overrides() {
        let object = SceneObject::new("tile", MeshKind::Plane)
            .uv_scaled(Vec2::new(2.0, 3.0))
            .colored(Vec4::ONE);
        assert_eq!(object.uv_scale, Some(Vec2::new(2.0, 3.0)));
        assert_eq!(object.color, Some(Vec4::ONE));
        assert!(object.texture.is_none());
        assert_eq!(object.transform, TransformSpec::default());
    }
}
