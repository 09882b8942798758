pub mod provide_repo;
