use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::types::{
    Campground, CampgroundAuthor, CampgroundDetail, CampgroundError, CampgroundImage,
    CampgroundUpdate, Comment, NewCampgroundRecord, Review,
};

/// Persistence operations over the campground collection.
///
/// Every operation is atomic at the single-record level only; consistency
/// across a campground and its children is the lifecycle service's
/// sequencing responsibility.
#[async_trait::async_trait]
pub trait CampgroundRepository: Send + Sync {
    /// Finds campgrounds, optionally filtered by a case-insensitive name
    /// pattern, returning the requested slice and the total matched count.
    ///
    /// The pattern is applied literally; callers escape user input first.
    async fn find(
        &self,
        name_pattern: Option<&str>,
        skip: i64,
        limit: Option<i64>,
    ) -> Result<(Vec<Campground>, i64), CampgroundError>;

    /// Fetches a single campground without expanding its children.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Campground>, CampgroundError>;

    /// Fetches a campground with its comments and reviews expanded, reviews
    /// newest first.
    async fn find_by_id_expanded(
        &self,
        id: Uuid,
    ) -> Result<Option<CampgroundDetail>, CampgroundError>;

    /// Inserts a fully enriched record and returns the persisted campground.
    async fn create(&self, record: NewCampgroundRecord) -> Result<Campground, CampgroundError>;

    /// Applies an update to the campground at `id`, returning the updated
    /// record, or `None` if the row no longer exists.
    async fn update_by_id(
        &self,
        id: Uuid,
        update: CampgroundUpdate,
    ) -> Result<Option<Campground>, CampgroundError>;

    /// Deletes the comments with the given ids. Ids that no longer exist are
    /// skipped; that still counts as success.
    async fn delete_comments_by_ids(&self, ids: &[Uuid]) -> Result<(), CampgroundError>;

    /// Deletes the reviews with the given ids, with the same semantics as
    /// [`delete_comments_by_ids`](Self::delete_comments_by_ids).
    async fn delete_reviews_by_ids(&self, ids: &[Uuid]) -> Result<(), CampgroundError>;

    /// Deletes the campground row. Returns `false` when the row was already
    /// gone, which callers treat as success.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, CampgroundError>;
}

/// Columns selected whenever a full campground row is read back.
const CAMPGROUND_COLUMNS: &str = "id, name, price, description, location, lat, lng, \
     image_url, image_id, created_at, author_id, author_username, \
     comment_ids, review_ids, rating";

/// PostgreSQL-backed campground repository.
pub struct PgCampgroundRepository {
    pool: PgPool,
}

impl PgCampgroundRepository {
    /// Creates a new repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn campground_from_row(row: &PgRow) -> Campground {
    let image_url: Option<String> = row.get("image_url");
    let image_id: Option<String> = row.get("image_id");

    Campground {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        description: row.get("description"),
        location: row.get("location"),
        lat: row.get("lat"),
        lng: row.get("lng"),
        image: image_url
            .zip(image_id)
            .map(|(url, public_id)| CampgroundImage { url, public_id }),
        created_at: row.get("created_at"),
        author: CampgroundAuthor {
            id: row.get("author_id"),
            username: row.get("author_username"),
        },
        comment_ids: row.get("comment_ids"),
        review_ids: row.get("review_ids"),
        rating: row.get("rating"),
    }
}

#[async_trait::async_trait]
impl CampgroundRepository for PgCampgroundRepository {
    async fn find(
        &self,
        name_pattern: Option<&str>,
        skip: i64,
        limit: Option<i64>,
    ) -> Result<(Vec<Campground>, i64), CampgroundError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {CAMPGROUND_COLUMNS}
            FROM campgrounds
            WHERE ($1::text IS NULL OR name ~* $1)
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(name_pattern)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let campgrounds = rows.iter().map(campground_from_row).collect();

        let count_row = sqlx::query(
            r#"
            SELECT COUNT(*) AS matched
            FROM campgrounds
            WHERE ($1::text IS NULL OR name ~* $1)
            "#,
        )
        .bind(name_pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((campgrounds, count_row.get("matched")))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Campground>, CampgroundError> {
        let row = sqlx::query(&format!(
            "SELECT {CAMPGROUND_COLUMNS} FROM campgrounds WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(campground_from_row))
    }

    async fn find_by_id_expanded(
        &self,
        id: Uuid,
    ) -> Result<Option<CampgroundDetail>, CampgroundError> {
        let Some(campground) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let comment_rows = sqlx::query(
            r#"
            SELECT id, text, author_username, created_at
            FROM comments
            WHERE id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(&campground.comment_ids)
        .fetch_all(&self.pool)
        .await?;

        let comments = comment_rows
            .into_iter()
            .map(|row| Comment {
                id: row.get("id"),
                text: row.get("text"),
                author_username: row.get("author_username"),
                created_at: row.get("created_at"),
            })
            .collect();

        let review_rows = sqlx::query(
            r#"
            SELECT id, rating, text, author_username, created_at
            FROM reviews
            WHERE id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(&campground.review_ids)
        .fetch_all(&self.pool)
        .await?;

        let reviews = review_rows
            .into_iter()
            .map(|row| Review {
                id: row.get("id"),
                rating: row.get("rating"),
                text: row.get("text"),
                author_username: row.get("author_username"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(Some(CampgroundDetail {
            campground,
            comments,
            reviews,
        }))
    }

    async fn create(&self, record: NewCampgroundRecord) -> Result<Campground, CampgroundError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO campgrounds (
                name, price, description, location, lat, lng,
                image_url, image_id, author_id, author_username
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {CAMPGROUND_COLUMNS}
            "#
        ))
        .bind(record.name.trim())
        .bind(&record.price)
        .bind(&record.description)
        .bind(&record.location)
        .bind(record.lat)
        .bind(record.lng)
        .bind(&record.image.url)
        .bind(&record.image.public_id)
        .bind(record.author.id)
        .bind(&record.author.username)
        .fetch_one(&self.pool)
        .await?;

        Ok(campground_from_row(&row))
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        update: CampgroundUpdate,
    ) -> Result<Option<Campground>, CampgroundError> {
        let (image_url, image_id) = match &update.image {
            Some(image) => (Some(image.url.as_str()), Some(image.public_id.as_str())),
            None => (None, None),
        };

        let row = sqlx::query(&format!(
            r#"
            UPDATE campgrounds SET
                name = $2, price = $3, description = $4, location = $5,
                lat = $6, lng = $7,
                image_url = COALESCE($8, image_url),
                image_id = COALESCE($9, image_id)
            WHERE id = $1
            RETURNING {CAMPGROUND_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.name.trim())
        .bind(&update.price)
        .bind(&update.description)
        .bind(&update.location)
        .bind(update.lat)
        .bind(update.lng)
        .bind(image_url)
        .bind(image_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(campground_from_row))
    }

    async fn delete_comments_by_ids(&self, ids: &[Uuid]) -> Result<(), CampgroundError> {
        if ids.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM comments WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_reviews_by_ids(&self, ids: &[Uuid]) -> Result<(), CampgroundError> {
        if ids.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM reviews WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, CampgroundError> {
        let result = sqlx::query("DELETE FROM campgrounds WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
