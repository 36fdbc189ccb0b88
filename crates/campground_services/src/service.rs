use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use auth_services::types::SessionUser;
use geo_services::{GeocodedLocation, Geocoder};
use media_services::{ImageStore, UploadedFile};

use crate::repository::CampgroundRepository;
use crate::types::{
    Campground, CampgroundAuthor, CampgroundDetail, CampgroundError, CampgroundForm,
    CampgroundPage, CampgroundUpdate, ListQuery, NO_MATCH_MESSAGE, NewCampgroundRecord, PER_PAGE,
    PageInfo,
};

/// Orchestrates the campground lifecycle: listing, creation with geocoding
/// and image enrichment, ownership-gated update and delete, and cascading
/// cleanup of dependent records and remote assets.
pub struct CampgroundService {
    repo: Arc<dyn CampgroundRepository>,
    geocoder: Arc<dyn Geocoder>,
    images: Arc<dyn ImageStore>,
}

impl CampgroundService {
    /// Creates a new lifecycle service over the given collaborators.
    pub fn new(
        repo: Arc<dyn CampgroundRepository>,
        geocoder: Arc<dyn Geocoder>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            repo,
            geocoder,
            images,
        }
    }

    /// Lists campgrounds.
    ///
    /// With a search term, names are matched case-insensitively against the
    /// literal text (metacharacters are escaped first) and paging is ignored
    /// entirely. Without one, results are paged with [`PER_PAGE`] items per
    /// page.
    pub async fn list(&self, query: &ListQuery) -> Result<CampgroundPage, CampgroundError> {
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = regex::escape(search);
            let (campgrounds, matched) = self.repo.find(Some(&pattern), 0, None).await?;

            let no_match = if matched == 0 {
                Some(NO_MATCH_MESSAGE.to_string())
            } else {
                None
            };

            return Ok(CampgroundPage {
                campgrounds,
                pagination: None,
                no_match,
            });
        }

        let current = query.page.unwrap_or(1).max(1);
        // The page number comes straight from the query string; saturate so
        // an absurd value yields an empty page instead of overflowing.
        let skip = (current - 1).saturating_mul(PER_PAGE);
        let (campgrounds, count) = self.repo.find(None, skip, Some(PER_PAGE)).await?;
        let pages = (count + PER_PAGE - 1) / PER_PAGE;

        Ok(CampgroundPage {
            campgrounds,
            pagination: Some(PageInfo { current, pages }),
            no_match: None,
        })
    }

    /// Creates a campground for the session user.
    ///
    /// Geocoding runs first, then the image upload; nothing is persisted
    /// unless both succeed. The author binding always comes from the session
    /// identity.
    pub async fn create(
        &self,
        author: &SessionUser,
        form: CampgroundForm,
        image: UploadedFile,
    ) -> Result<Campground, CampgroundError> {
        let geocoded = self.geocode(&form.location).await?;
        let stored = self.images.upload(&image.filename, image.bytes).await?;
        let public_id = stored.public_id.clone();

        let record = NewCampgroundRecord {
            name: form.name,
            price: form.price,
            description: form.description,
            location: geocoded.formatted_address,
            lat: geocoded.latitude,
            lng: geocoded.longitude,
            image: stored.into(),
            author: CampgroundAuthor {
                id: author.id,
                username: author.username.clone(),
            },
        };

        match self.repo.create(record).await {
            Ok(campground) => Ok(campground),
            Err(e) => {
                // The insert failed after the upload succeeded; the asset is
                // not rolled back and stays orphaned in storage.
                warn!(
                    "Campground insert failed; orphaned image {} remains in storage",
                    public_id
                );
                Err(e)
            }
        }
    }

    /// Fetches a campground with its comments and reviews expanded, reviews
    /// newest first.
    pub async fn show(&self, id: Uuid) -> Result<CampgroundDetail, CampgroundError> {
        self.repo
            .find_by_id_expanded(id)
            .await?
            .ok_or(CampgroundError::NotFound)
    }

    /// Updates a campground owned by the caller.
    ///
    /// The new location is geocoded with the same abort semantics as create.
    /// A replacement image, when supplied, is uploaded without deleting the
    /// previous asset.
    pub async fn update(
        &self,
        id: Uuid,
        caller: &SessionUser,
        form: CampgroundForm,
        new_image: Option<UploadedFile>,
    ) -> Result<Campground, CampgroundError> {
        self.ensure_owner(id, caller).await?;

        let geocoded = self.geocode(&form.location).await?;

        let image = match new_image {
            Some(file) => {
                debug!("Replacing image for campground {}; old asset is kept", id);
                let stored = self.images.upload(&file.filename, file.bytes).await?;
                Some(stored.into())
            }
            None => None,
        };

        let update = CampgroundUpdate {
            name: form.name,
            price: form.price,
            description: form.description,
            location: geocoded.formatted_address,
            lat: geocoded.latitude,
            lng: geocoded.longitude,
            image,
        };

        self.repo
            .update_by_id(id, update)
            .await?
            .ok_or(CampgroundError::NotFound)
    }

    /// Deletes a campground owned by the caller, cascading first.
    ///
    /// Comments go first, then reviews, then the remote image, then the
    /// record itself. Any failure aborts at that step and leaves the record
    /// in place, so children never outlive their parent reference.
    pub async fn delete(&self, id: Uuid, caller: &SessionUser) -> Result<(), CampgroundError> {
        let campground = self.ensure_owner(id, caller).await?;

        self.repo
            .delete_comments_by_ids(&campground.comment_ids)
            .await?;
        self.repo
            .delete_reviews_by_ids(&campground.review_ids)
            .await?;

        if let Some(image) = &campground.image {
            self.images.destroy(&image.public_id).await?;
        }

        // A concurrent delete may have removed the row already; losing that
        // race still counts as success.
        let _won = self.repo.delete_by_id(id).await?;
        Ok(())
    }

    /// Confirms the caller owns the campground at `id`.
    ///
    /// A missing record and a non-owned record both come back as
    /// `Forbidden`: mutating routes do not leak existence.
    async fn ensure_owner(
        &self,
        id: Uuid,
        caller: &SessionUser,
    ) -> Result<Campground, CampgroundError> {
        let campground = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CampgroundError::Forbidden)?;

        if campground.author.id != caller.id {
            return Err(CampgroundError::Forbidden);
        }

        Ok(campground)
    }

    async fn geocode(&self, location: &str) -> Result<GeocodedLocation, CampgroundError> {
        self.geocoder.geocode(location).await.map_err(|e| {
            warn!("Geocoding failed for {:?}: {}", location, e);
            CampgroundError::InvalidAddress
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use geo_services::GeocodeError;
    use media_services::{MediaError, StoredImage};
    use regex::RegexBuilder;

    use crate::types::CampgroundImage;

    struct MockRepo {
        campgrounds: Mutex<Vec<Campground>>,
        comments: Mutex<Vec<Uuid>>,
        reviews: Mutex<Vec<Uuid>>,
        fail_create: bool,
        fail_delete_comments: bool,
    }

    impl MockRepo {
        fn new() -> Self {
            Self {
                campgrounds: Mutex::new(Vec::new()),
                comments: Mutex::new(Vec::new()),
                reviews: Mutex::new(Vec::new()),
                fail_create: false,
                fail_delete_comments: false,
            }
        }

        fn with_campgrounds(campgrounds: Vec<Campground>) -> Self {
            let repo = Self::new();
            *repo.campgrounds.lock().unwrap() = campgrounds;
            repo
        }

        fn snapshot(&self) -> Vec<Campground> {
            self.campgrounds.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CampgroundRepository for MockRepo {
        async fn find(
            &self,
            name_pattern: Option<&str>,
            skip: i64,
            limit: Option<i64>,
        ) -> Result<(Vec<Campground>, i64), CampgroundError> {
            let all = self.campgrounds.lock().unwrap();

            let filtered: Vec<Campground> = match name_pattern {
                Some(pattern) => {
                    let matcher = RegexBuilder::new(pattern)
                        .case_insensitive(true)
                        .build()
                        .unwrap();
                    all.iter()
                        .filter(|c| matcher.is_match(&c.name))
                        .cloned()
                        .collect()
                }
                None => all.clone(),
            };

            let matched = filtered.len() as i64;
            let sliced: Vec<Campground> = filtered
                .into_iter()
                .skip(skip as usize)
                .take(limit.map(|l| l as usize).unwrap_or(usize::MAX))
                .collect();

            Ok((sliced, matched))
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Campground>, CampgroundError> {
            Ok(self
                .campgrounds
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id)
                .cloned())
        }

        async fn find_by_id_expanded(
            &self,
            id: Uuid,
        ) -> Result<Option<CampgroundDetail>, CampgroundError> {
            Ok(self.find_by_id(id).await?.map(|campground| CampgroundDetail {
                campground,
                comments: Vec::new(),
                reviews: Vec::new(),
            }))
        }

        async fn create(
            &self,
            record: NewCampgroundRecord,
        ) -> Result<Campground, CampgroundError> {
            if self.fail_create {
                return Err(CampgroundError::Persistence(sqlx::Error::PoolTimedOut));
            }

            let campground = Campground {
                id: Uuid::new_v4(),
                name: record.name,
                price: record.price,
                description: record.description,
                location: record.location,
                lat: record.lat,
                lng: record.lng,
                image: Some(record.image),
                created_at: Utc::now(),
                author: record.author,
                comment_ids: Vec::new(),
                review_ids: Vec::new(),
                rating: Vec::new(),
            };

            self.campgrounds.lock().unwrap().push(campground.clone());
            Ok(campground)
        }

        async fn update_by_id(
            &self,
            id: Uuid,
            update: CampgroundUpdate,
        ) -> Result<Option<Campground>, CampgroundError> {
            let mut all = self.campgrounds.lock().unwrap();
            let Some(campground) = all.iter_mut().find(|c| c.id == id) else {
                return Ok(None);
            };

            campground.name = update.name;
            campground.price = update.price;
            campground.description = update.description;
            campground.location = update.location;
            campground.lat = update.lat;
            campground.lng = update.lng;
            if let Some(image) = update.image {
                campground.image = Some(image);
            }

            Ok(Some(campground.clone()))
        }

        async fn delete_comments_by_ids(&self, ids: &[Uuid]) -> Result<(), CampgroundError> {
            if self.fail_delete_comments {
                return Err(CampgroundError::Persistence(sqlx::Error::PoolTimedOut));
            }
            self.comments.lock().unwrap().retain(|id| !ids.contains(id));
            Ok(())
        }

        async fn delete_reviews_by_ids(&self, ids: &[Uuid]) -> Result<(), CampgroundError> {
            self.reviews.lock().unwrap().retain(|id| !ids.contains(id));
            Ok(())
        }

        async fn delete_by_id(&self, id: Uuid) -> Result<bool, CampgroundError> {
            let mut all = self.campgrounds.lock().unwrap();
            let before = all.len();
            all.retain(|c| c.id != id);
            Ok(all.len() < before)
        }
    }

    struct MockGeocoder {
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockGeocoder {
        fn ok() -> Self {
            Self {
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Geocoder for MockGeocoder {
        async fn geocode(&self, _address: &str) -> Result<GeocodedLocation, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GeocodeError::ZeroResults);
            }
            Ok(GeocodedLocation {
                latitude: 37.7456,
                longitude: -119.5936,
                formatted_address: "Yosemite Valley, CA 95389, USA".to_string(),
            })
        }
    }

    struct MockImageStore {
        uploads: AtomicUsize,
        destroyed: Mutex<Vec<String>>,
        fail_upload: bool,
    }

    impl MockImageStore {
        fn ok() -> Self {
            Self {
                uploads: AtomicUsize::new(0),
                destroyed: Mutex::new(Vec::new()),
                fail_upload: false,
            }
        }

        fn failing_upload() -> Self {
            Self {
                uploads: AtomicUsize::new(0),
                destroyed: Mutex::new(Vec::new()),
                fail_upload: true,
            }
        }
    }

    #[async_trait::async_trait]
    impl ImageStore for MockImageStore {
        async fn upload(
            &self,
            filename: &str,
            _bytes: Vec<u8>,
        ) -> Result<StoredImage, MediaError> {
            if self.fail_upload {
                return Err(MediaError::Upload("storage rejected the file".to_string()));
            }
            self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(StoredImage {
                url: format!("https://res.example.com/image/upload/{}", filename),
                public_id: format!("camp/{}", filename),
            })
        }

        async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
            self.destroyed.lock().unwrap().push(public_id.to_string());
            Ok(())
        }
    }

    fn session_user(name: &str) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            username: name.to_string(),
        }
    }

    fn form(name: &str) -> CampgroundForm {
        CampgroundForm {
            name: name.to_string(),
            price: "15.00".to_string(),
            description: "A quiet spot in the pines".to_string(),
            location: "Yosemite Valley".to_string(),
        }
    }

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    fn campground(name: &str, owner: &SessionUser) -> Campground {
        Campground {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price: "15.00".to_string(),
            description: "A quiet spot in the pines".to_string(),
            location: "Yosemite Valley, CA 95389, USA".to_string(),
            lat: 37.7456,
            lng: -119.5936,
            image: Some(CampgroundImage {
                url: "https://res.example.com/image/upload/site.jpg".to_string(),
                public_id: "camp/site.jpg".to_string(),
            }),
            created_at: Utc::now(),
            author: CampgroundAuthor {
                id: owner.id,
                username: owner.username.clone(),
            },
            comment_ids: Vec::new(),
            review_ids: Vec::new(),
            rating: Vec::new(),
        }
    }

    fn service(
        repo: Arc<MockRepo>,
        geocoder: Arc<MockGeocoder>,
        images: Arc<MockImageStore>,
    ) -> CampgroundService {
        CampgroundService::new(repo, geocoder, images)
    }

    #[tokio::test]
    async fn create_binds_author_from_session_and_pairs_image_fields() {
        let repo = Arc::new(MockRepo::new());
        let geocoder = Arc::new(MockGeocoder::ok());
        let images = Arc::new(MockImageStore::ok());
        let svc = service(repo.clone(), geocoder, images);

        let author = session_user("alice");
        let created = svc
            .create(&author, form("Pine Hollow"), file("pine.jpg"))
            .await
            .unwrap();

        assert_eq!(created.author.id, author.id);
        assert_eq!(created.author.username, "alice");
        assert_eq!(created.location, "Yosemite Valley, CA 95389, USA");

        let image = created.image.expect("image is set on creation");
        assert!(!image.url.is_empty());
        assert!(!image.public_id.is_empty());
        assert_eq!(repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn create_with_unresolvable_address_uploads_and_persists_nothing() {
        let repo = Arc::new(MockRepo::new());
        let geocoder = Arc::new(MockGeocoder::failing());
        let images = Arc::new(MockImageStore::ok());
        let svc = service(repo.clone(), geocoder, images.clone());

        let result = svc
            .create(&session_user("alice"), form("Pine Hollow"), file("pine.jpg"))
            .await;

        assert!(matches!(result, Err(CampgroundError::InvalidAddress)));
        assert_eq!(images.uploads.load(Ordering::SeqCst), 0);
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn create_with_failed_upload_persists_nothing() {
        let repo = Arc::new(MockRepo::new());
        let geocoder = Arc::new(MockGeocoder::ok());
        let images = Arc::new(MockImageStore::failing_upload());
        let svc = service(repo.clone(), geocoder, images);

        let result = svc
            .create(&session_user("alice"), form("Pine Hollow"), file("pine.jpg"))
            .await;

        assert!(matches!(result, Err(CampgroundError::Upload(_))));
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn create_with_failed_insert_surfaces_persistence_error() {
        let mut repo = MockRepo::new();
        repo.fail_create = true;
        let repo = Arc::new(repo);
        let geocoder = Arc::new(MockGeocoder::ok());
        let images = Arc::new(MockImageStore::ok());
        let svc = service(repo, geocoder, images.clone());

        let result = svc
            .create(&session_user("alice"), form("Pine Hollow"), file("pine.jpg"))
            .await;

        assert!(matches!(result, Err(CampgroundError::Persistence(_))));
        // The already-uploaded image is not rolled back.
        assert_eq!(images.uploads.load(Ordering::SeqCst), 1);
        assert!(images.destroyed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn show_missing_id_is_not_found() {
        let svc = service(
            Arc::new(MockRepo::new()),
            Arc::new(MockGeocoder::ok()),
            Arc::new(MockImageStore::ok()),
        );

        let result = svc.show(Uuid::new_v4()).await;
        assert!(matches!(result, Err(CampgroundError::NotFound)));
    }

    #[tokio::test]
    async fn update_by_non_owner_is_forbidden_and_leaves_record_unchanged() {
        let owner = session_user("alice");
        let existing = campground("Pine Hollow", &owner);
        let repo = Arc::new(MockRepo::with_campgrounds(vec![existing.clone()]));
        let svc = service(
            repo.clone(),
            Arc::new(MockGeocoder::ok()),
            Arc::new(MockImageStore::ok()),
        );

        let intruder = session_user("mallory");
        let result = svc
            .update(existing.id, &intruder, form("Stolen Hollow"), None)
            .await;

        assert!(matches!(result, Err(CampgroundError::Forbidden)));
        let stored = &repo.snapshot()[0];
        assert_eq!(stored.name, "Pine Hollow");
        assert_eq!(stored.author.id, owner.id);
    }

    #[tokio::test]
    async fn update_never_touches_rating_or_author() {
        let owner = session_user("alice");
        let mut existing = campground("Pine Hollow", &owner);
        existing.rating = vec![4.0, 5.0];
        let repo = Arc::new(MockRepo::with_campgrounds(vec![existing.clone()]));
        let svc = service(
            repo.clone(),
            Arc::new(MockGeocoder::ok()),
            Arc::new(MockImageStore::ok()),
        );

        // A client payload smuggling rating/author fields deserializes into
        // a form that simply has no place for them.
        let smuggled: CampgroundForm = serde_json::from_str(
            r#"{
                "name": "Pine Hollow",
                "price": "20.00",
                "description": "Now with a view",
                "location": "Yosemite Valley",
                "rating": [1.0],
                "author": { "id": "00000000-0000-0000-0000-000000000000", "username": "mallory" }
            }"#,
        )
        .unwrap();

        let updated = svc.update(existing.id, &owner, smuggled, None).await.unwrap();

        assert_eq!(updated.rating, vec![4.0, 5.0]);
        assert_eq!(updated.author.id, owner.id);
        assert_eq!(updated.price, "20.00");
    }

    #[tokio::test]
    async fn update_without_new_image_keeps_the_existing_pair() {
        let owner = session_user("alice");
        let existing = campground("Pine Hollow", &owner);
        let original_image = existing.image.clone().unwrap();
        let repo = Arc::new(MockRepo::with_campgrounds(vec![existing.clone()]));
        let svc = service(
            repo,
            Arc::new(MockGeocoder::ok()),
            Arc::new(MockImageStore::ok()),
        );

        let updated = svc
            .update(existing.id, &owner, form("Pine Hollow"), None)
            .await
            .unwrap();

        assert_eq!(updated.image, Some(original_image));
    }

    #[tokio::test]
    async fn update_with_new_image_replaces_the_pair_together() {
        let owner = session_user("alice");
        let existing = campground("Pine Hollow", &owner);
        let repo = Arc::new(MockRepo::with_campgrounds(vec![existing.clone()]));
        let images = Arc::new(MockImageStore::ok());
        let svc = service(repo, Arc::new(MockGeocoder::ok()), images.clone());

        let updated = svc
            .update(existing.id, &owner, form("Pine Hollow"), Some(file("new.jpg")))
            .await
            .unwrap();

        let image = updated.image.unwrap();
        assert!(image.url.ends_with("new.jpg"));
        assert_eq!(image.public_id, "camp/new.jpg");
        // The old asset is deliberately left in storage.
        assert!(images.destroyed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_cascades_children_then_image_then_record() {
        let owner = session_user("alice");
        let mut existing = campground("Pine Hollow", &owner);
        existing.comment_ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        existing.review_ids = vec![Uuid::new_v4(), Uuid::new_v4()];

        let repo = Arc::new(MockRepo::with_campgrounds(vec![existing.clone()]));
        *repo.comments.lock().unwrap() = existing.comment_ids.clone();
        *repo.reviews.lock().unwrap() = existing.review_ids.clone();

        let images = Arc::new(MockImageStore::ok());
        let svc = service(repo.clone(), Arc::new(MockGeocoder::ok()), images.clone());

        svc.delete(existing.id, &owner).await.unwrap();

        assert!(repo.comments.lock().unwrap().is_empty());
        assert!(repo.reviews.lock().unwrap().is_empty());
        assert_eq!(
            *images.destroyed.lock().unwrap(),
            vec!["camp/site.jpg".to_string()]
        );
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn delete_aborts_before_record_removal_when_cleanup_fails() {
        let owner = session_user("alice");
        let mut existing = campground("Pine Hollow", &owner);
        existing.comment_ids = vec![Uuid::new_v4()];

        let mut repo = MockRepo::with_campgrounds(vec![existing.clone()]);
        repo.fail_delete_comments = true;
        let repo = Arc::new(repo);
        *repo.comments.lock().unwrap() = existing.comment_ids.clone();

        let images = Arc::new(MockImageStore::ok());
        let svc = service(repo.clone(), Arc::new(MockGeocoder::ok()), images.clone());

        let result = svc.delete(existing.id, &owner).await;

        assert!(matches!(result, Err(CampgroundError::Persistence(_))));
        // The campground record survives and still references its children.
        assert_eq!(repo.snapshot().len(), 1);
        assert!(images.destroyed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_forbidden() {
        let owner = session_user("alice");
        let existing = campground("Pine Hollow", &owner);
        let repo = Arc::new(MockRepo::with_campgrounds(vec![existing.clone()]));
        let svc = service(
            repo.clone(),
            Arc::new(MockGeocoder::ok()),
            Arc::new(MockImageStore::ok()),
        );

        let result = svc.delete(existing.id, &session_user("mallory")).await;

        assert!(matches!(result, Err(CampgroundError::Forbidden)));
        assert_eq!(repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn mutating_a_missing_campground_is_forbidden_not_not_found() {
        let svc = service(
            Arc::new(MockRepo::new()),
            Arc::new(MockGeocoder::ok()),
            Arc::new(MockImageStore::ok()),
        );

        let result = svc.delete(Uuid::new_v4(), &session_user("alice")).await;
        assert!(matches!(result, Err(CampgroundError::Forbidden)));
    }

    #[tokio::test]
    async fn listing_page_two_of_twenty_returns_items_nine_through_sixteen() {
        let owner = session_user("alice");
        let all: Vec<Campground> = (1..=20)
            .map(|i| campground(&format!("Camp {:02}", i), &owner))
            .collect();
        let repo = Arc::new(MockRepo::with_campgrounds(all));
        let svc = service(
            repo,
            Arc::new(MockGeocoder::ok()),
            Arc::new(MockImageStore::ok()),
        );

        let page = svc
            .list(&ListQuery {
                search: None,
                page: Some(2),
            })
            .await
            .unwrap();

        let names: Vec<&str> = page.campgrounds.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Camp 09", "Camp 10", "Camp 11", "Camp 12", "Camp 13", "Camp 14", "Camp 15",
                "Camp 16"
            ]
        );
        assert_eq!(page.pagination, Some(PageInfo { current: 2, pages: 3 }));
        assert!(page.no_match.is_none());
    }

    #[tokio::test]
    async fn listing_an_absurd_page_number_returns_an_empty_page() {
        let owner = session_user("alice");
        let repo = Arc::new(MockRepo::with_campgrounds(vec![campground(
            "Pine Hollow",
            &owner,
        )]));
        let svc = service(
            repo,
            Arc::new(MockGeocoder::ok()),
            Arc::new(MockImageStore::ok()),
        );

        let page = svc
            .list(&ListQuery {
                search: None,
                page: Some(i64::MAX),
            })
            .await
            .unwrap();

        assert!(page.campgrounds.is_empty());
        assert_eq!(
            page.pagination,
            Some(PageInfo {
                current: i64::MAX,
                pages: 1
            })
        );
    }

    #[tokio::test]
    async fn search_matches_metacharacters_literally() {
        let owner = session_user("alice");
        let repo = Arc::new(MockRepo::with_campgrounds(vec![
            campground("a.b* Basin", &owner),
            campground("axbYY Basin", &owner),
            campground("aab Basin", &owner),
            campground("A.B* RIDGE", &owner),
        ]));
        let svc = service(
            repo,
            Arc::new(MockGeocoder::ok()),
            Arc::new(MockImageStore::ok()),
        );

        let page = svc
            .list(&ListQuery {
                search: Some("a.b*".to_string()),
                page: None,
            })
            .await
            .unwrap();

        let names: Vec<&str> = page.campgrounds.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a.b* Basin", "A.B* RIDGE"]);
        assert!(page.no_match.is_none());
    }

    #[tokio::test]
    async fn search_with_no_matches_reports_it_explicitly() {
        let owner = session_user("alice");
        let repo = Arc::new(MockRepo::with_campgrounds(vec![campground(
            "Pine Hollow",
            &owner,
        )]));
        let svc = service(
            repo,
            Arc::new(MockGeocoder::ok()),
            Arc::new(MockImageStore::ok()),
        );

        let page = svc
            .list(&ListQuery {
                search: Some("glacier".to_string()),
                page: None,
            })
            .await
            .unwrap();

        assert!(page.campgrounds.is_empty());
        assert_eq!(page.no_match.as_deref(), Some(NO_MATCH_MESSAGE));
    }

    #[tokio::test]
    async fn search_ignores_paging_entirely() {
        let owner = session_user("alice");
        let all: Vec<Campground> = (1..=20)
            .map(|i| campground(&format!("Camp {:02}", i), &owner))
            .collect();
        let repo = Arc::new(MockRepo::with_campgrounds(all));
        let svc = service(
            repo,
            Arc::new(MockGeocoder::ok()),
            Arc::new(MockImageStore::ok()),
        );

        let page = svc
            .list(&ListQuery {
                search: Some("Camp".to_string()),
                page: Some(2),
            })
            .await
            .unwrap();

        assert_eq!(page.campgrounds.len(), 20);
        assert!(page.pagination.is_none());
    }
}
