pub mod labels;
pub mod tensor;
