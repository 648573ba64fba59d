use crate::domain::payment::{CustomerDetails, PaymentView};
use crate::domain::transitions::AppliedTransition;
use crate::repo::courses_repo::CoursesRepo;
use crate::repo::{PaymentStore, TransitionReceipt};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct NewPayment {
    pub payment_id: Uuid,
    pub gateway_intent_id: String,
    pub course_id: Uuid,
    pub customer: CustomerDetails,
    pub amount_minor: i64,
    pub currency: String,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentRecord {
    pub payment_id: Uuid,
    pub gateway_intent_id: String,
    pub course_id: Uuid,
    pub customer_email: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub billing_address: Option<String>,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub enrollment_status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub refunded_at: Option<DateTime<Utc>>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn to_view(&self) -> PaymentView {
        PaymentView {
            id: self.payment_id,
            payment_intent_id: self.gateway_intent_id.clone(),
            status: self.status.clone(),
            enrollment_status: self.enrollment_status.clone(),
            amount: self.amount_minor,
            currency: self.currency.clone(),
            course_id: self.course_id,
            customer_email: self.customer_email.clone(),
            paid_at: self.paid_at,
            refunded_at: self.refunded_at,
        }
    }
}

#[derive(Debug, Default)]
pub struct PaymentListFilter {
    pub status: Option<String>,
    pub course_id: Option<Uuid>,
    pub email: Option<String>,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Serialize)]
pub struct StatusTotals {
    pub status: String,
    pub count: i64,
    pub revenue_minor: i64,
}

#[derive(Debug, Serialize)]
pub struct CourseTotals {
    pub course_id: Uuid,
    pub succeeded_count: i64,
    pub revenue_minor: i64,
}

const SELECT_COLUMNS: &str = "payment_id, gateway_intent_id, course_id, customer_email, customer_name, customer_phone, billing_address, amount_minor, currency, status, enrollment_status, paid_at, refunded_at, metadata, created_at";

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

#[async_trait::async_trait]
impl PaymentStore for PaymentsRepo {
    async fn insert(&self, data: &NewPayment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                payment_id, gateway_intent_id, course_id, customer_email, customer_name,
                customer_phone, billing_address, amount_minor, currency,
                status, enrollment_status, metadata
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9,
                'PENDING', 'PENDING', $10
            )
            "#,
        )
        .bind(data.payment_id)
        .bind(&data.gateway_intent_id)
        .bind(data.course_id)
        .bind(&data.customer.email)
        .bind(&data.customer.name)
        .bind(&data.customer.phone)
        .bind(&data.customer.billing_address)
        .bind(data.amount_minor)
        .bind(&data.currency)
        .bind(&data.metadata)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_intent_id(&self, intent_id: &str) -> anyhow::Result<Option<PaymentRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM payments WHERE gateway_intent_id = $1"
        ))
        .bind(intent_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_record))
    }

    async fn find_by_id(&self, payment_id: Uuid) -> anyhow::Result<Option<PaymentRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM payments WHERE payment_id = $1"
        ))
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_record))
    }

    /// Compare-and-set status update plus the seat increment, in one
    /// transaction. The CAS only moves the row while it still holds the
    /// transition's expected source status, so the confirm-poll path and the
    /// webhook path cannot both apply the same transition; the shared
    /// transaction keeps a settled status from ever landing without its
    /// seat.
    async fn apply_transition(
        &self,
        intent_id: &str,
        course_id: Uuid,
        plan: &AppliedTransition,
    ) -> anyhow::Result<TransitionReceipt> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = $3,
                enrollment_status = $4,
                paid_at = CASE WHEN $5 THEN now() ELSE paid_at END,
                refunded_at = CASE WHEN $6 THEN now() ELSE refunded_at END
            WHERE gateway_intent_id = $1 AND status = $2
            "#,
        )
        .bind(intent_id)
        .bind(plan.from.as_str())
        .bind(plan.to.as_str())
        .bind(plan.enrollment_status.as_str())
        .bind(plan.set_paid_at)
        .bind(plan.set_refunded_at)
        .execute(tx.as_mut())
        .await?;
        let applied = result.rows_affected() == 1;

        let seated = if applied && plan.increment_capacity {
            Some(CoursesRepo::increment_enrollment_tx(&mut tx, course_id).await?)
        } else {
            None
        };

        tx.commit().await?;
        Ok(TransitionReceipt { applied, seated })
    }
}

impl PaymentsRepo {
    pub async fn list(&self, filter: &PaymentListFilter) -> anyhow::Result<(Vec<PaymentRecord>, i64)> {
        let page = filter.page.max(1);
        let per_page = filter.per_page.clamp(1, 100);
        let offset = (page - 1) * per_page;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM payments
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR course_id = $2)
              AND ($3::text IS NULL OR customer_email = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(&filter.status)
        .bind(filter.course_id)
        .bind(&filter.email)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) AS total FROM payments
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR course_id = $2)
              AND ($3::text IS NULL OR customer_email = $3)
            "#,
        )
        .bind(&filter.status)
        .bind(filter.course_id)
        .bind(&filter.email)
        .fetch_one(&self.pool)
        .await?
        .get("total");

        Ok((rows.into_iter().map(map_record).collect(), total))
    }

    pub async fn totals_by_status(&self) -> anyhow::Result<Vec<StatusTotals>> {
        let rows = sqlx::query(
            r#"
            SELECT status, COUNT(*)::BIGINT AS count, COALESCE(SUM(amount_minor), 0)::BIGINT AS revenue_minor
            FROM payments
            GROUP BY status
            ORDER BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| StatusTotals {
                status: r.get("status"),
                count: r.get("count"),
                revenue_minor: r.get("revenue_minor"),
            })
            .collect())
    }

    pub async fn totals_by_course(&self) -> anyhow::Result<Vec<CourseTotals>> {
        let rows = sqlx::query(
            r#"
            SELECT course_id,
                   COUNT(*) FILTER (WHERE status = 'SUCCEEDED')::BIGINT AS succeeded_count,
                   COALESCE(SUM(amount_minor) FILTER (WHERE status = 'SUCCEEDED'), 0)::BIGINT AS revenue_minor
            FROM payments
            GROUP BY course_id
            ORDER BY revenue_minor DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CourseTotals {
                course_id: r.get("course_id"),
                succeeded_count: r.get("succeeded_count"),
                revenue_minor: r.get("revenue_minor"),
            })
            .collect())
    }
}

fn map_record(r: sqlx::postgres::PgRow) -> PaymentRecord {
    PaymentRecord {
        payment_id: r.get("payment_id"),
        gateway_intent_id: r.get("gateway_intent_id"),
        course_id: r.get("course_id"),
        customer_email: r.get("customer_email"),
        customer_name: r.get("customer_name"),
        customer_phone: r.get("customer_phone"),
        billing_address: r.get("billing_address"),
        amount_minor: r.get("amount_minor"),
        currency: r.get("currency"),
        status: r.get("status"),
        enrollment_status: r.get("enrollment_status"),
        paid_at: r.get("paid_at"),
        refunded_at: r.get("refunded_at"),
        metadata: r.get("metadata"),
        created_at: r.get("created_at"),
    }
}
