pub mod models;
pub mod reference_lookup;
pub mod sale_repo;

#[cfg(test)]
pub(crate) mod test_support;
