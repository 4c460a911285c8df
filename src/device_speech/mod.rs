pub mod impl_stub;
pub mod interface;
