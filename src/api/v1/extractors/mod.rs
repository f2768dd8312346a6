mod gate_ctx;

pub use gate_ctx::{GateCtx, GateCtxExtractor};
