pub mod impl_console;
pub mod impl_memory;
pub mod interface;
