use std::{fs::File, path::Path};

use ash::util::read_spv;

use crate::error::{NegotiationError, Result};

/// Reads a compiled SPIR-V file into properly aligned 32-bit words.
pub fn read_shader_code(path: &Path) -> Result<Vec<u32>> {
    let shader_read = |source| NegotiationError::ShaderRead {
        path: path.to_owned(),
        source,
    };
    let mut file = File::open(path).map_err(shader_read)?;
    read_spv(&mut file).map_err(shader_read)
}
