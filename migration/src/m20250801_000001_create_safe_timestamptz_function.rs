use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// metadata->>'dueDate' は自由形式のため、変換できない値は例外ではなく NULL として扱う。
// タイムゾーン指定のない値は UTC として解釈する。
// 受け付ける形式はアプリ側の parse_due_date と揃える（前後の空白は不可）:
//   YYYY-MM-DD
//   YYYY-MM-DD[T ]HH:MM:SS[.f]
//   YYYY-MM-DD[Tt ]HH:MM:SS[.f](Z|z|+HH:MM|-HH:MM)
const CREATE_FUNCTION: &str = r#"
CREATE OR REPLACE FUNCTION safe_timestamptz(p_value text)
RETURNS timestamptz
LANGUAGE plpgsql
STABLE
SET timezone = 'UTC'
AS $$
BEGIN
    IF p_value IS NULL OR p_value !~ '^\d{4}-\d{2}-\d{2}([T ]\d{2}:\d{2}:\d{2}(\.\d+)?|[Tt ]\d{2}:\d{2}:\d{2}(\.\d+)?([Zz]|[+-]\d{2}:\d{2}))?$' THEN
        RETURN NULL;
    END IF;
    RETURN p_value::timestamptz;
EXCEPTION WHEN others THEN
    RETURN NULL;
END;
$$;
"#;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(CREATE_FUNCTION)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP FUNCTION IF EXISTS safe_timestamptz(text);")
            .await?;

        Ok(())
    }
}
