pub mod member_repo;
