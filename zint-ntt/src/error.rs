#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("transform length {n} exceeds the supported maximum {max}")]
    TransformTooLarge { n: usize, max: usize },
    #[error("failed to allocate {bytes} bytes of transform scratch")]
    Allocation { bytes: usize },
}
