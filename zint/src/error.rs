#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid decimal integer literal")]
    Parse,
    #[error("division by zero")]
    DivisionByZero,
}
