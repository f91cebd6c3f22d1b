use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// 一括集計ルーチン。件数・優先度・上位タグ・月次推移・期限間近タスクを 1 往復で返す。
// スコア計算とゼロ埋めはアプリケーション側で行う。
const CREATE_FUNCTION: &str = r#"
CREATE OR REPLACE FUNCTION get_user_analytics(
    p_user_id uuid,
    p_now timestamptz,
    p_week_ahead timestamptz,
    p_tag_limit integer DEFAULT 20,
    p_deadline_limit integer DEFAULT 10
)
RETURNS jsonb
LANGUAGE sql
STABLE
SET timezone = 'UTC'
AS $$
WITH owned AS (
    SELECT
        t.id,
        t.title,
        t.status,
        t.created_at,
        t.metadata->>'dueDate' AS due_date_raw,
        safe_timestamptz(t.metadata->>'dueDate') AS due_at,
        CASE
            WHEN t.metadata->>'priority' IN ('low', 'medium', 'high') THEN t.metadata->>'priority'
            ELSE 'medium'
        END AS priority,
        CASE
            WHEN jsonb_typeof(t.metadata->'tags') = 'array' THEN t.metadata->'tags'
            ELSE '[]'::jsonb
        END AS tags
    FROM tasks t
    WHERE t.user_id = p_user_id
),
months AS (
    SELECT generate_series(
        date_trunc('month', p_now) - interval '5 months',
        date_trunc('month', p_now),
        interval '1 month'
    ) AS month_start
),
tag_counts AS (
    SELECT e.elem #>> '{}' AS tag, count(*) AS cnt
    FROM owned o
    CROSS JOIN LATERAL jsonb_array_elements(o.tags) AS e(elem)
    WHERE jsonb_typeof(e.elem) = 'string'
    GROUP BY 1
    ORDER BY cnt DESC, tag COLLATE "C" ASC
    LIMIT p_tag_limit
),
monthly AS (
    SELECT
        m.month_start,
        to_char(m.month_start, 'YYYY-MM') AS month,
        count(o.id) AS created,
        count(o.id) FILTER (WHERE o.status = 'done') AS completed
    FROM months m
    LEFT JOIN owned o
        ON o.created_at >= m.month_start
       AND o.created_at < m.month_start + interval '1 month'
    GROUP BY m.month_start
),
deadlines AS (
    SELECT o.id, o.title, o.due_date_raw, o.due_at, o.priority
    FROM owned o
    WHERE o.status <> 'done'
      AND o.due_at IS NOT NULL
      AND o.due_at >= p_now
      AND o.due_at <= p_week_ahead
    ORDER BY o.due_at ASC, o.id ASC
    LIMIT p_deadline_limit
)
SELECT jsonb_build_object(
    'total', (SELECT count(*) FROM owned),
    'completed', (SELECT count(*) FROM owned WHERE status = 'done'),
    'pending', (SELECT count(*) FROM owned WHERE status = 'pending'),
    'in_progress', (SELECT count(*) FROM owned WHERE status = 'in-progress'),
    'overdue', (
        SELECT count(*) FROM owned
        WHERE status <> 'done' AND due_at IS NOT NULL AND due_at < p_now
    ),
    'by_priority', jsonb_build_object(
        'low', (SELECT count(*) FROM owned WHERE priority = 'low'),
        'medium', (SELECT count(*) FROM owned WHERE priority = 'medium'),
        'high', (SELECT count(*) FROM owned WHERE priority = 'high')
    ),
    'by_tag', COALESCE(
        (SELECT jsonb_agg(jsonb_build_object('tag', tag, 'count', cnt)
                ORDER BY cnt DESC, tag COLLATE "C" ASC)
         FROM tag_counts),
        '[]'::jsonb
    ),
    'monthly', COALESCE(
        (SELECT jsonb_agg(jsonb_build_object(
                    'month', month, 'created', created, 'completed', completed)
                ORDER BY month_start)
         FROM monthly),
        '[]'::jsonb
    ),
    'deadlines', COALESCE(
        (SELECT jsonb_agg(jsonb_build_object(
                    'task_id', id, 'title', title, 'due_date', due_date_raw, 'priority', priority)
                ORDER BY due_at ASC, id ASC)
         FROM deadlines),
        '[]'::jsonb
    )
);
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
            .execute_unprepared(
                "DROP FUNCTION IF EXISTS get_user_analytics(uuid, timestamptz, timestamptz, integer, integer);",
            )
            .await?;

        Ok(())
    }
}
