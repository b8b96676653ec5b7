use std::path::Path;

use log::warn;

use crate::error::TextureLoadError;

/// A decoded image uploaded as a mipmapped 2D texture.
pub struct Texture {
    id: gl::types::GLuint,
}

impl Texture {
    /// Decodes the file, flips it to GL's bottom-up row order, and uploads
    /// it as RGBA with generated mipmaps.
    pub fn from_file(path: &Path) -> Result<Self, TextureLoadError> {
        let image = image::open(path)
            .map_err(|source| TextureLoadError {
                path: path.to_path_buf(),
                source,
            })?
            .flipv()
            .into_rgba8();

        let (width, height) = image.dimensions();
        if !width.is_power_of_two() || !height.is_power_of_two() {
            warn!("texture {} is not power-of-2 dimensions", path.display());
        }

        let mut id = 0;
        unsafe {
            gl::GenTextures(1, &mut id);
            gl::BindTexture(gl::TEXTURE_2D, id);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA as i32,
                width as i32,
                height as i32,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                image.as_raw().as_ptr().cast(),
            );
            gl::GenerateMipmap(gl::TEXTURE_2D);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as i32);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                gl::LINEAR_MIPMAP_LINEAR as i32,
            );
        }
        Ok(Self { id })
    }

    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }

    /// Binds to the given texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_2D, self.id);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_the_path() {
        // Decoding fails before any driver call is made.
        let err = Texture::from_file(Path::new("no_such_texture.png"))
            .err()
            .expect("load should fail");
        assert!(err.to_string().contains("no_such_texture.png"));
    }
}
