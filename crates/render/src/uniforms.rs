use crate::backend::RenderError;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Named slot inside [`UniformBlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformSlot {
    Model,
    View,
    Projection,
    TextureMix,
}

impl UniformSlot {
    fn is_matrix(self) -> bool {
        !matches!(self, UniformSlot::TextureMix)
    }
}

/// CPU-side copy of the program's uniform buffer, laid out for std140/WGSL.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct UniformBlock {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    texture_mix: f32,
    _pad: [f32; 3],
}

impl Default for UniformBlock {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            texture_mix: 0.0,
            _pad: [0.0; 3],
        }
    }
}

impl UniformBlock {
    /// Look up a uniform by its shader name.
    pub fn location(name: &str) -> Option<UniformSlot> {
        match name {
            "model" => Some(UniformSlot::Model),
            "view" => Some(UniformSlot::View),
            "projection" => Some(UniformSlot::Projection),
            "texture_mix" => Some(UniformSlot::TextureMix),
            _ => None,
        }
    }

    pub fn set_matrix4(&mut self, name: &str, value: Mat4) -> Result<(), RenderError> {
        let slot = Self::location(name).ok_or_else(|| RenderError::UnknownUniform(name.into()))?;
        let cols = value.to_cols_array_2d();
        match slot {
            UniformSlot::Model => self.model = cols,
            UniformSlot::View => self.view = cols,
            UniformSlot::Projection => self.projection = cols,
            UniformSlot::TextureMix => {
                return Err(RenderError::UniformType {
                    name: name.into(),
                    expected: "mat4",
                });
            }
        }
        Ok(())
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<(), RenderError> {
        match Self::location(name) {
            Some(UniformSlot::TextureMix) => {
                self.texture_mix = value;
                Ok(())
            }
            Some(slot) if slot.is_matrix() => Err(RenderError::UniformType {
                name: name.into(),
                expected: "f32",
            }),
            _ => Err(RenderError::UnknownUniform(name.into())),
        }
    }

    pub fn matrix4(&self, slot: UniformSlot) -> Option<Mat4> {
        match slot {
            UniformSlot::Model => Some(Mat4::from_cols_array_2d(&self.model)),
            UniformSlot::View => Some(Mat4::from_cols_array_2d(&self.view)),
            UniformSlot::Projection => Some(Mat4::from_cols_array_2d(&self.projection)),
            UniformSlot::TextureMix => None,
        }
    }

    pub fn texture_mix(&self) -> f32 {
        self.texture_mix
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn block_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<UniformBlock>() % 16, 0);
        assert_eq!(UniformBlock::default().as_bytes().len(), 208);
    }

    #[test]
    fn set_and_read_matrix() {
        let mut block = UniformBlock::default();
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        block.set_matrix4("view", m).unwrap();
        assert_eq!(block.matrix4(UniformSlot::View), Some(m));
        assert_eq!(block.matrix4(UniformSlot::Model), Some(Mat4::IDENTITY));
    }

    #[test]
    fn unknown_uniform_rejected() {
        let mut block = UniformBlock::default();
        let err = block.set_matrix4("mvp", Mat4::IDENTITY).unwrap_err();
        assert!(matches!(err, RenderError::UnknownUniform(n) if n == "mvp"));
    }

    #[test]
    fn type_mismatch_rejected() {
        let mut block = UniformBlock::default();
        assert!(matches!(
            block.set_float("model", 1.0),
            Err(RenderError::UniformType { .. })
        ));
        assert!(matches!(
            block.set_matrix4("texture_mix", Mat4::IDENTITY),
            Err(RenderError::UniformType { .. })
        ));
        block.set_float("texture_mix", 0.2).unwrap();
        assert_eq!(block.texture_mix(), 0.2);
    }
}
