pub mod benchmark;
pub mod build;
pub mod conversion;
pub mod input_source;
pub mod process;

#[cfg(test)]
pub(crate) mod test_support;
