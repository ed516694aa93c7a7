pub mod etl_runner;

#[cfg(test)]
pub mod test_support;
