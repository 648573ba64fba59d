use crate::domain::course::Course;
use crate::repo::CourseStore;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct CoursesRepo {
    pub pool: PgPool,
}

impl CoursesRepo {
    /// Conditional seat increment: takes the seat only while one is free.
    /// Runs inside the payment transition's transaction so the status move
    /// and the seat commit or roll back together. Returns false when the
    /// course was already full, which the caller logs for manual correction
    /// rather than failing the settled payment.
    pub async fn increment_enrollment_tx(
        tx: &mut Transaction<'_, Postgres>,
        course_id: Uuid,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET capacity_current = capacity_current + 1, updated_at = now()
            WHERE course_id = $1
              AND (capacity_max IS NULL OR capacity_current < capacity_max)
            "#,
        )
        .bind(course_id)
        .execute(tx.as_mut())
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait::async_trait]
impl CourseStore for CoursesRepo {
    async fn find_by_id(&self, course_id: Uuid) -> anyhow::Result<Option<Course>> {
        let row = sqlx::query(
            "SELECT course_id, title, is_active, price, discount_price, currency, capacity_max, capacity_current FROM courses WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Course {
            course_id: r.get("course_id"),
            title: r.get("title"),
            is_active: r.get("is_active"),
            price: r.get("price"),
            discount_price: r.get("discount_price"),
            currency: r.get("currency"),
            capacity_max: r.get("capacity_max"),
            capacity_current: r.get("capacity_current"),
        }))
    }
}
