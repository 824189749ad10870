use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use strata_chunk::{ChunkBuf, ChunkCoord, ChunkDims};

use crate::generator::WorldGenerator;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("chunk {coord:?} failed in {stage}: {message}")]
    Panicked {
        coord: ChunkCoord,
        stage: String,
        message: String,
    },
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn run_stage(
    coord: ChunkCoord,
    stage: impl FnOnce() -> String,
    f: impl FnOnce(),
) -> Result<(), GenerationError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let stage = stage();
        let message = panic_message(payload.as_ref());
        log::error!("chunk {:?}: {} panicked: {}", coord, stage, message);
        GenerationError::Panicked {
            coord,
            stage,
            message,
        }
    })
}

/// Builds one chunk: base pass, then every populator in order, all on a private
/// staging buffer. The buffer is only returned when every stage finished; on a
/// panic it is dropped and the caller sees nothing of it.
pub fn generate_chunk(
    generator: &dyn WorldGenerator,
    coord: ChunkCoord,
    dims: ChunkDims,
) -> Result<ChunkBuf, GenerationError> {
    let mut staging = ChunkBuf::new(coord, dims);
    run_stage(coord, || "generate".to_string(), || generator.generate(&mut staging, coord))?;
    for (i, p) in generator.populators().iter().enumerate() {
        run_stage(
            coord,
            || format!("populator #{} ({})", i, p.name()),
            || p.populate(&mut staging, coord),
        )?;
    }
    Ok(staging)
}
