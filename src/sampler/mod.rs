pub mod compass;
mod error;
mod record;
mod sampler;

pub use error::SamplerError;
pub use record::SampleRecord;
pub use sampler::PassSampler;
