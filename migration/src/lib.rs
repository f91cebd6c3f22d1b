// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

mod m20250511_073638_create_task_table;
mod m20250512_000001_add_task_indexes;
mod m20250801_000001_create_safe_timestamptz_function;
mod m20250801_000002_create_user_analytics_function;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250511_073638_create_task_table::Migration),
            Box::new(m20250512_000001_add_task_indexes::Migration),
            Box::new(m20250801_000001_create_safe_timestamptz_function::Migration),
            Box::new(m20250801_000002_create_user_analytics_function::Migration),
        ]
    }
}
