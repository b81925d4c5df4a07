use sqlx::PgPool;

use crate::models::client::ClientRow;

pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age_range: Option<String>,
}

pub async fn create_client(pool: &PgPool, client: &NewClient) -> Result<ClientRow, sqlx::Error> {
    sqlx::query_as::<_, ClientRow>(
        r#"
        INSERT INTO clients (first_name, last_name, email, phone, age_range)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&client.first_name)
    .bind(&client.last_name)
    .bind(&client.email)
    .bind(&client.phone)
    .bind(&client.age_range)
    .fetch_one(pool)
    .await
}

pub async fn get_client(pool: &PgPool, id: i64) -> Result<Option<ClientRow>, sqlx::Error> {
    sqlx::query_as::<_, ClientRow>("SELECT * FROM clients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn client_exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM clients WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}
