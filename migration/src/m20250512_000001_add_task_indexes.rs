use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 所有者ごとの新しい順サンプル取得用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Tasks::Table)
                    .name("idx_tasks_user_created_at")
                    .col(Tasks::UserId)
                    .col((Tasks::CreatedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // 所有者ごとのステータス別件数用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Tasks::Table)
                    .name("idx_tasks_user_status")
                    .col(Tasks::UserId)
                    .col(Tasks::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .name("idx_tasks_user_status")
                    .table(Tasks::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .name("idx_tasks_user_created_at")
                    .table(Tasks::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    UserId,
    Status,
    CreatedAt,
}
