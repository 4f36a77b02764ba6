//! REST client for the Roll-In New York backend.
//!
//! Thin request/response layer: every call is a single round trip with no
//! retries and no caching — recovery is always a new user action, and the
//! screens cache results themselves (see [`crate::cache`]). Endpoints that
//! mutate favorites return enough for the caller to bump the shared
//! [`RefreshSignal`](crate::cache::RefreshSignal).
//!
//! Authentication is a bearer-less token carried in the URL path, the way
//! the backend expects it. Credentials are shape-checked locally before any
//! network call so obviously bad input fails without a round trip.

use crate::{Error, Memory, Movie, Place, Review};
use log::{debug, info, warn};
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

/// Production backend.
pub const DEFAULT_BASE_URL: &str = "https://roll-in-new-york-backend.vercel.app";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// App-start movie hydration runs a handful of lookups at a time; the
// backend proxies TMDB and tolerates this comfortably.
const HYDRATE_CONCURRENCY: usize = 8;

/// A signed-in user, as returned by sign-in/sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub username: String,
    pub email: String,
    pub token: String,
    pub id: String,
}

impl UserSession {
    /// Whether this session can call token-scoped endpoints.
    pub fn signed_in(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Outcome of toggling a favorite on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeStatus {
    Added,
    Removed,
}

/// A review to post. The backend stores the record as sent, so the client
/// supplies author, place, and timestamp itself.
#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    /// Author's user id.
    pub user: String,
    /// Place id, repeated in the body alongside the path parameter.
    pub place: String,
    /// ISO-8601 creation timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Star rating, 0-5.
    pub note: u8,
    pub content: String,
}

// ============================================================================
// Wire envelopes
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlacesEnvelope {
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct FavoritesEnvelope {
    // Absent for a user with no favorites yet
    #[serde(rename = "favoritePlaces", default)]
    favorite_places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct LikeEnvelope {
    status: String,
}

#[derive(Debug, Deserialize)]
struct IsLikedEnvelope {
    result: bool,
}

#[derive(Debug, Deserialize)]
struct ReviewUserWire {
    username: String,
}

#[derive(Debug, Deserialize)]
struct ReviewWire {
    user: ReviewUserWire,
    #[serde(rename = "createdAt")]
    created_at: String,
    note: u8,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ReviewsEnvelope {
    reviews: Vec<ReviewWire>,
}

#[derive(Debug, Deserialize)]
struct MovieWire {
    original_title: String,
    #[serde(default)]
    poster_path: String,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    release_date: String,
}

#[derive(Debug, Deserialize)]
struct MovieEnvelope {
    movie: MovieWire,
}

#[derive(Debug, Deserialize)]
struct MemoryWire {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct MemoriesEnvelope {
    urls: Vec<MemoryWire>,
}

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    url: Option<String>,
    public_id: Option<String>,
}

impl UploadEnvelope {
    // Success is the presence of `url`; `public_id` may be absent even on
    // an accepted upload.
    fn into_memory(self) -> Result<Memory, Error> {
        match self.url {
            Some(url) => Ok(Memory {
                url,
                public_id: self.public_id.unwrap_or_default(),
            }),
            None => Err(Error::Api("Upload rejected by backend".to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteEnvelope {
    result: bool,
}

#[derive(Debug, Deserialize)]
struct AccountEnvelope {
    result: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    token: String,
    #[serde(default)]
    id: String,
}

// ============================================================================
// Credential validation
// ============================================================================

/// Shape-check an email address the way the sign-in form does:
/// `local@domain.tld` with a 2-6 letter TLD, no spaces.
pub fn email_is_valid(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let email_re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}$").unwrap()
    });
    email_re.is_match(email)
}

fn check_credentials(email: &str, password: &str) -> Result<(), Error> {
    if email.is_empty() || password.is_empty() {
        return Err(Error::Api("Missing field".to_string()));
    }
    if !email_is_valid(email) {
        return Err(Error::Api("Invalid email address".to_string()));
    }
    Ok(())
}

// ============================================================================
// Client
// ============================================================================

/// Client for the Roll-In New York backend.
///
/// One instance per app; reqwest pools connections underneath. All methods
/// take `&self` and are safe to call concurrently.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Client against the production backend.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an arbitrary base URL (tests, staging).
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// All filming locations (the home-screen map markers).
    pub async fn fetch_places(&self) -> Result<Vec<Place>, Error> {
        let body: PlacesEnvelope = self.get_json("/places").await?;
        info!("[Api] fetched {} places", body.places.len());
        Ok(body.places)
    }

    /// The user's favorite places, newest first as the backend returns them.
    pub async fn fetch_favorites(&self, token: &str) -> Result<Vec<Place>, Error> {
        let path = format!("/favorites/places/{}", token);
        let body: FavoritesEnvelope = self.get_json(&path).await?;
        debug!("[Api] {} favorites", body.favorite_places.len());
        Ok(body.favorite_places)
    }

    /// Toggle a place in the user's favorites. The backend decides the
    /// direction; callers bump the refresh signal on either outcome.
    pub async fn toggle_like(&self, token: &str, place_id: &str) -> Result<LikeStatus, Error> {
        let url = self.endpoint(&format!("/users/likePlace/{}/{}", token, place_id));
        let resp = self
            .client
            .put(&url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let body: LikeEnvelope = Self::read_json(resp).await?;
        match body.status.as_str() {
            "Added" => Ok(LikeStatus::Added),
            "Removed" => Ok(LikeStatus::Removed),
            other => Err(Error::Api(format!("Unexpected like status: {}", other))),
        }
    }

    /// Whether a place is in the user's favorites (the popup heart state).
    pub async fn is_liked(&self, token: &str, place_id: &str) -> Result<bool, Error> {
        let path = format!("/users/isLiked/{}/{}", token, place_id);
        let body: IsLikedEnvelope = self.get_json(&path).await?;
        Ok(body.result)
    }

    /// Reviews for a place, author names flattened out of the user record.
    pub async fn fetch_reviews(&self, place_id: &str) -> Result<Vec<Review>, Error> {
        let path = format!("/reviews/{}", place_id);
        let body: ReviewsEnvelope = self.get_json(&path).await?;
        Ok(body
            .reviews
            .into_iter()
            .map(|r| Review {
                username: r.user.username,
                created_at: r.created_at,
                note: r.note,
                content: r.content,
            })
            .collect())
    }

    /// Post a review on a place.
    pub async fn post_review(
        &self,
        token: &str,
        place_id: &str,
        review: &NewReview,
    ) -> Result<(), Error> {
        let url = self.endpoint(&format!("/reviews/{}/{}", token, place_id));
        let resp = self
            .client
            .post(&url)
            .json(review)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Self::check_status(&resp)?;
        info!("[Api] posted review on {}", place_id);
        Ok(())
    }

    /// Movie metadata by TMDB id. The backend proxies TMDB, so the id is
    /// echoed back from the request rather than trusted from the body.
    pub async fn fetch_movie(&self, movie_id: i64) -> Result<Movie, Error> {
        let url = self.endpoint("/movies/");
        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "movieId": movie_id }))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let body: MovieEnvelope = Self::read_json(resp).await?;
        Ok(Movie {
            id: movie_id,
            title: body.movie.original_title,
            poster_path: body.movie.poster_path,
            overview: body.movie.overview,
            release_date: body.movie.release_date,
        })
    }

    /// Hydrate movie metadata for a set of TMDB ids, a few at a time.
    ///
    /// Runs at app start over every id in the places' `moviesList`. Ids that
    /// fail to resolve are skipped with a warning rather than failing the
    /// whole batch; results come back in input order.
    pub async fn fetch_movies(&self, ids: &[i64]) -> Vec<Movie> {
        use futures::stream::{self, StreamExt};

        let movies: Vec<Option<Movie>> = stream::iter(ids.iter().copied())
            .map(|id| async move {
                match self.fetch_movie(id).await {
                    Ok(movie) => Some(movie),
                    Err(e) => {
                        warn!("[Api] movie {} failed to hydrate: {}", id, e);
                        None
                    }
                }
            })
            .buffered(HYDRATE_CONCURRENCY)
            .collect()
            .await;

        let hydrated: Vec<Movie> = movies.into_iter().flatten().collect();
        info!("[Api] hydrated {}/{} movies", hydrated.len(), ids.len());
        hydrated
    }

    /// Uploaded photos ("memories") for one of the user's favorite places.
    pub async fn fetch_memories(&self, token: &str, place_id: &str) -> Result<Vec<Memory>, Error> {
        let path = format!("/favorites/pictures/{}/{}", token, place_id);
        let body: MemoriesEnvelope = self.get_json(&path).await?;
        Ok(body
            .urls
            .into_iter()
            .map(|m| Memory {
                url: m.secure_url,
                public_id: m.public_id,
            })
            .collect())
    }

    /// Upload a photo for a place. Success is a body carrying `url`; a
    /// 200 without one is a refusal.
    pub async fn upload_memory(
        &self,
        token: &str,
        place_id: &str,
        filename: &str,
        jpeg: Vec<u8>,
    ) -> Result<Memory, Error> {
        let part = reqwest::multipart::Part::bytes(jpeg)
            .file_name(filename.to_string())
            .mime_str("image/jpeg")
            .map_err(|e| Error::Network(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("photoFromFront", part)
            .text("userToken", token.to_string())
            .text("idPlace", place_id.to_string());

        let url = self.endpoint("/favorites/pictures");
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let body: UploadEnvelope = Self::read_json(resp).await?;
        let memory = body.into_memory()?;
        info!("[Api] uploaded memory for {}", place_id);
        Ok(memory)
    }

    /// Delete an uploaded photo by its cloud-storage id.
    pub async fn delete_memory(&self, public_id: &str) -> Result<(), Error> {
        let url = self.endpoint("/favorites/pictures");
        let resp = self
            .client
            .delete(&url)
            .json(&serde_json::json!({ "publicId": public_id }))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let body: DeleteEnvelope = Self::read_json(resp).await?;
        if body.result {
            Ok(())
        } else {
            Err(Error::Api("Delete refused by backend".to_string()))
        }
    }

    /// Classic (email + password) sign-in.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserSession, Error> {
        check_credentials(email, password)?;
        self.account_call(
            "/users/signin/classic",
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Classic account creation.
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserSession, Error> {
        if username.is_empty() {
            return Err(Error::Api("Missing field".to_string()));
        }
        check_credentials(email, password)?;
        self.account_call(
            "/users/signup/classic",
            &serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }),
        )
        .await
    }

    async fn account_call(
        &self,
        path: &str,
        payload: &serde_json::Value,
    ) -> Result<UserSession, Error> {
        let url = self.endpoint(path);
        let resp = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let body: AccountEnvelope = Self::read_json(resp).await?;
        if !body.result {
            let reason = body.error.unwrap_or_else(|| "Sign-in refused".to_string());
            warn!("[Api] account call refused: {}", reason);
            return Err(Error::Api(reason));
        }
        Ok(UserSession {
            username: body.username,
            email: body.email,
            token: body.token,
            id: body.id,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint(path);
        debug!("[Api] GET {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Self::read_json(resp).await
    }

    fn check_status(resp: &reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if !status.is_success() {
            warn!("[Api] HTTP {} from {}", status, resp.url());
            return Err(Error::Api(format!("HTTP {}", status)));
        }
        Ok(())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        Self::check_status(&resp)?;
        resp.json::<T>()
            .await
            .map_err(|e| Error::Network(format!("Bad response body: {}", e)))
    }
}

/// Synchronous favorites fetch for the mobile shells: builds a tokio
/// runtime, runs the async client to completion, and returns.
#[cfg(feature = "ffi")]
pub fn fetch_favorites_sync(token: &str) -> Result<Vec<Place>, Error> {
    use tokio::runtime::Builder;

    let rt = Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|e| Error::Network(format!("Runtime error: {}", e)))?;

    let client = BackendClient::new()?;
    rt.block_on(client.fetch_favorites(token))
}
