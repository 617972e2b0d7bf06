use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, OrderLineId, ProductId};
use domain::repository::{CustomerRepository, OrderRepository, ProductRepository};
use domain::{
    Customer, CustomerKind, Money, Order, OrderLine, OrderNumber, OrderStatus, Product, Result,
};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_customer(row: PgRow) -> Result<Customer> {
        let kind: CustomerKind = serde_json::from_value(row.try_get("kind")?)?;

        Ok(Customer {
            id: CustomerId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            credit_rating: row.try_get("credit_rating")?,
            kind,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            sku: row.try_get("sku")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            stock_quantity: row.try_get::<i32, _>("stock_quantity")? as u32,
            category: row.try_get("category")?,
            active: row.try_get("active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_order(row: PgRow, lines: Vec<OrderLine>) -> Result<Order> {
        let status: OrderStatus =
            serde_json::from_value(serde_json::Value::String(row.try_get("status")?))?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            number: OrderNumber::from(row.try_get::<String, _>("order_number")?),
            date_received: row.try_get::<DateTime<Utc>, _>("date_received")?,
            prepaid: row.try_get("prepaid")?,
            total_price: Money::from_cents(row.try_get("total_price_cents")?),
            status,
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            lines,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_line(row: PgRow) -> Result<OrderLine> {
        Ok(OrderLine {
            id: OrderLineId::from_uuid(row.try_get::<Uuid, _>("id")?),
            product_id: ProductId::from_uuid(row.try_get::<Uuid, _>("product_id")?),
            quantity: row.try_get::<i32, _>("quantity")? as u32,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
        })
    }

    /// Loads the lines of an order in placement order.
    async fn load_lines(&self, order_id: OrderId) -> Result<Vec<OrderLine>> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, quantity, unit_price_cents
            FROM order_lines
            WHERE order_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_line).collect()
    }

    /// Loads full aggregates for a set of order rows.
    async fn hydrate_orders(&self, rows: Vec<PgRow>) -> Result<Vec<Order>> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let id = OrderId::from_uuid(row.try_get::<Uuid, _>("id")?);
            let lines = self.load_lines(id).await?;
            orders.push(Self::row_to_order(row, lines)?);
        }
        Ok(orders)
    }
}

#[async_trait]
impl CustomerRepository for PostgresStore {
    async fn insert(&self, customer: &Customer) -> Result<()> {
        let kind = serde_json::to_value(&customer.kind)?;

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, address, credit_rating, kind, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(customer.id.as_uuid())
        .bind(&customer.name)
        .bind(&customer.address)
        .bind(&customer.credit_rating)
        .bind(kind)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query(
            "SELECT id, name, address, credit_rating, kind, created_at FROM customers WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_customer).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query(
            "SELECT id, name, address, credit_rating, kind, created_at FROM customers ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_customer).collect()
    }
}

const PRODUCT_COLUMNS: &str = "id, sku, name, description, price_cents, stock_quantity, category, active, created_at, updated_at";

#[async_trait]
impl ProductRepository for PostgresStore {
    async fn insert(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, sku, name, description, price_cents, stock_quantity, category, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(product.stock_quantity as i32)
        .bind(&product.category)
        .bind(product.active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price_cents = $4, stock_quantity = $5,
                category = $6, active = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(product.stock_quantity as i32)
        .bind(&product.category)
        .bind(product.active)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = $1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY created_at ASC"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn find_by_active(&self, active: bool) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE active = $1 ORDER BY created_at ASC"
        ))
        .bind(active)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }
}

const ORDER_COLUMNS: &str = "id, order_number, date_received, prepaid, total_price_cents, status, customer_id, created_at, updated_at";

#[async_trait]
impl OrderRepository for PostgresStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        // The order row and all line rows go in one transaction; either the
        // whole aggregate is durably stored or none of it is.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, order_number, date_received, prepaid, total_price_cents, status, customer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.number.as_str())
        .bind(order.date_received)
        .bind(order.prepaid)
        .bind(order.total_price.cents())
        .bind(order.status.as_str())
        .bind(order.customer_id.as_uuid())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, line) in order.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_lines (id, order_id, position, product_id, quantity, unit_price_cents)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(line.id.as_uuid())
            .bind(order.id.as_uuid())
            .bind(position as i32)
            .bind(line.product_id.as_uuid())
            .bind(line.quantity as i32)
            .bind(line.unit_price.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<()> {
        // Lines are immutable after placement; only the order row changes.
        sqlx::query("UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(order.id.as_uuid())
            .bind(order.status.as_str())
            .bind(order.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let lines = self.load_lines(id).await?;
                Ok(Some(Self::row_to_order(row, lines)?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY created_at ASC"
        ))
        .bind(customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        self.hydrate_orders(rows).await
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE status = $1 ORDER BY created_at ASC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        self.hydrate_orders(rows).await
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.hydrate_orders(rows).await
    }
}
