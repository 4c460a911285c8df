pub mod main;
pub mod slot;
#[cfg(test)]
mod tests;
