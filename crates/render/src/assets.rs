use crate::backend::RenderError;
use crate::image_data::ImageData;
use std::path::Path;
use viewscape_common::AssetPaths;

/// Everything the viewport reads from disk, loaded once at setup.
#[derive(Debug, Clone)]
pub struct SceneAssets {
    pub vertex_source: String,
    pub fragment_source: String,
    /// One image per texture unit, in unit order.
    pub textures: Vec<ImageData>,
}

impl SceneAssets {
    pub fn load(paths: &AssetPaths) -> Result<Self, RenderError> {
        let vertex_source = read_shader(&paths.vertex_shader_path())?;
        let fragment_source = read_shader(&paths.fragment_shader_path())?;
        let textures = paths
            .texture_paths()
            .iter()
            .map(ImageData::load)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(
            "loaded scene assets from {} ({} textures)",
            paths.root.display(),
            textures.len()
        );
        Ok(Self {
            vertex_source,
            fragment_source,
            textures,
        })
    }
}

fn read_shader(path: &Path) -> Result<String, RenderError> {
    std::fs::read_to_string(path).map_err(|source| RenderError::ShaderSource {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::path::PathBuf;

    fn write_assets(root: &Path) -> AssetPaths {
        std::fs::create_dir_all(root.join("shaders")).unwrap();
        std::fs::write(root.join("shaders/v.wgsl"), "// vertex").unwrap();
        std::fs::write(root.join("shaders/f.wgsl"), "// fragment").unwrap();
        RgbaImage::new(4, 4).save(root.join("t0.png")).unwrap();
        AssetPaths {
            root: root.to_path_buf(),
            vertex_shader: PathBuf::from("shaders/v.wgsl"),
            fragment_shader: PathBuf::from("shaders/f.wgsl"),
            textures: vec![PathBuf::from("t0.png")],
        }
    }

    #[test]
    fn loads_all_assets() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_assets(dir.path());
        let assets = SceneAssets::load(&paths).unwrap();
        assert_eq!(assets.vertex_source, "// vertex");
        assert_eq!(assets.textures.len(), 1);
        assert_eq!(assets.textures[0].width, 4);
    }

    #[test]
    fn missing_shader_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = write_assets(dir.path());
        paths.fragment_shader = PathBuf::from("shaders/missing.wgsl");
        match SceneAssets::load(&paths) {
            Err(RenderError::ShaderSource { path, .. }) => {
                assert!(path.ends_with("shaders/missing.wgsl"));
            }
            other => panic!("expected shader source error, got {other:?}"),
        }
    }

    #[test]
    fn missing_texture_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = write_assets(dir.path());
        paths.textures.push(PathBuf::from("nope.png"));
        assert!(matches!(
            SceneAssets::load(&paths),
            Err(RenderError::TextureLoad { .. })
        ));
    }

    #[test]
    fn shipped_assets_load() {
        let paths = AssetPaths {
            root: Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets"),
            ..AssetPaths::default()
        };
        let assets = SceneAssets::load(&paths).unwrap();
        assert!(assets.vertex_source.contains("fn vs_main"));
        assert!(assets.fragment_source.contains("fn fs_main"));
        assert_eq!(assets.textures.len(), 2);
        assert!(assets.textures.iter().all(|t| t.width == 256 && t.height == 256));
    }
}
