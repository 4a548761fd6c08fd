//! Tag data access.
//!
//! [`TagsClient`] manages the tenant's tag collection; [`GenerationTags`]
//! manages the tags attached to a single generation. Both keep a local
//! snapshot of the last fetched page and invalidate after mutations by
//! refetching over the network, never by patching the cache in place.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use domain::models::{CreateTagInput, Tag, UpdateTagInput};

use crate::error::ClientError;
use crate::graphql::{run_query, GraphqlTransport, QueryCache, RequestPolicy};
use crate::operations;
use crate::session::Session;

/// Default page size for tag listings.
pub const DEFAULT_TAG_LIMIT: i64 = 100;
/// Default page offset for tag listings.
pub const DEFAULT_TAG_OFFSET: i64 = 0;

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Network(format!("Malformed response: {e}")))
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|err| err.message.as_ref())
        .map(|msg| msg.to_string())
        .next()
        .unwrap_or_else(|| "Invalid input".to_string())
}

/// Execute a mutation and extract its payload field.
///
/// Server-reported errors surface with their original message. Boolean
/// mutations report success as `true`; a null or `false` payload means the
/// server acknowledged the request but did nothing.
async fn run_mutation(
    transport: &dyn GraphqlTransport,
    session: &Session,
    document: &'static str,
    variables: Value,
    field: &str,
    empty_message: &'static str,
) -> Result<Value, ClientError> {
    let response = transport.execute(session, document, variables).await?;
    if let Some(message) = response.error_message() {
        return Err(ClientError::Mutation(message.to_string()));
    }
    let payload = response
        .data
        .and_then(|data| data.get(field).cloned())
        .unwrap_or(Value::Null);
    match payload {
        Value::Null | Value::Bool(false) => Err(ClientError::EmptyResult(empty_message)),
        payload => Ok(payload),
    }
}

/// Client for the tenant-wide tag collection.
pub struct TagsClient {
    transport: Arc<dyn GraphqlTransport>,
    cache: QueryCache,
    tags: Mutex<Vec<Tag>>,
    limit: i64,
    offset: i64,
}

impl TagsClient {
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self::with_page(transport, DEFAULT_TAG_LIMIT, DEFAULT_TAG_OFFSET)
    }

    pub fn with_page(transport: Arc<dyn GraphqlTransport>, limit: i64, offset: i64) -> Self {
        Self {
            transport,
            cache: QueryCache::default(),
            tags: Mutex::new(Vec::new()),
            limit,
            offset,
        }
    }

    /// Snapshot of the last fetched page.
    pub fn tags(&self) -> Vec<Tag> {
        self.tags.lock().map(|tags| tags.clone()).unwrap_or_default()
    }

    /// Find a tag in the snapshot by id.
    pub fn tag_by_id(&self, id: Uuid) -> Option<Tag> {
        self.tags().into_iter().find(|tag| tag.id == id)
    }

    /// Find a tag in the snapshot by slug.
    pub fn tag_by_slug(&self, slug: &str) -> Option<Tag> {
        self.tags().into_iter().find(|tag| tag.slug == slug)
    }

    /// Fetch the tag page, preferring fresh data but tolerating a network
    /// failure when a cached page exists.
    pub async fn list(&self, session: &Session) -> Result<Vec<Tag>, ClientError> {
        self.fetch(session, RequestPolicy::CacheAndNetwork).await
    }

    /// Fetch the tag page over the network unconditionally.
    pub async fn refresh(&self, session: &Session) -> Result<Vec<Tag>, ClientError> {
        self.fetch(session, RequestPolicy::NetworkOnly).await
    }

    async fn fetch(
        &self,
        session: &Session,
        policy: RequestPolicy,
    ) -> Result<Vec<Tag>, ClientError> {
        let variables = json!({ "limit": self.limit, "offset": self.offset });
        let data = run_query(
            self.transport.as_ref(),
            &self.cache,
            session,
            operations::GET_TAGS,
            variables,
            policy,
        )
        .await?;

        let tags: Vec<Tag> = match data.get("tags") {
            Some(Value::Null) | None => Vec::new(),
            Some(value) => decode(value.clone())?,
        };

        if let Ok(mut snapshot) = self.tags.lock() {
            *snapshot = tags.clone();
        }
        Ok(tags)
    }

    /// Fetch a single tag by id, bypassing the listing snapshot.
    pub async fn fetch_tag(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<Option<Tag>, ClientError> {
        let data = run_query(
            self.transport.as_ref(),
            &self.cache,
            session,
            operations::GET_TAG,
            json!({ "id": id }),
            RequestPolicy::CacheAndNetwork,
        )
        .await?;
        match data.get("tag") {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(decode(value.clone())?)),
        }
    }

    /// Fetch a single tag by slug.
    pub async fn fetch_tag_by_slug(
        &self,
        session: &Session,
        slug: &str,
    ) -> Result<Option<Tag>, ClientError> {
        let data = run_query(
            self.transport.as_ref(),
            &self.cache,
            session,
            operations::GET_TAG_BY_SLUG,
            json!({ "slug": slug }),
            RequestPolicy::CacheAndNetwork,
        )
        .await?;
        match data.get("tagBySlug") {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(decode(value.clone())?)),
        }
    }

    /// Create a tag, then refetch the listing so the snapshot converges.
    pub async fn create_tag(
        &self,
        session: &Session,
        input: CreateTagInput,
    ) -> Result<Tag, ClientError> {
        input
            .validate()
            .map_err(|e| ClientError::Mutation(first_validation_message(&e)))?;
        let payload = self
            .mutate(
                session,
                operations::CREATE_TAG,
                json!({ "input": input }),
                "createTag",
                "Failed to create tag",
            )
            .await?;
        let tag: Tag = decode(payload)?;
        self.refetch_after_mutation(session).await;
        Ok(tag)
    }

    /// Update a tag, then refetch the listing.
    pub async fn update_tag(
        &self,
        session: &Session,
        input: UpdateTagInput,
    ) -> Result<Tag, ClientError> {
        input
            .validate()
            .map_err(|e| ClientError::Mutation(first_validation_message(&e)))?;
        let payload = self
            .mutate(
                session,
                operations::UPDATE_TAG,
                json!({ "input": input }),
                "updateTag",
                "Failed to update tag",
            )
            .await?;
        let tag: Tag = decode(payload)?;
        self.refetch_after_mutation(session).await;
        Ok(tag)
    }

    /// Delete a tag, then refetch the listing.
    pub async fn delete_tag(&self, session: &Session, id: Uuid) -> Result<(), ClientError> {
        self.mutate(
            session,
            operations::DELETE_TAG,
            json!({ "id": id }),
            "deleteTag",
            "Failed to delete tag",
        )
        .await?;
        self.refetch_after_mutation(session).await;
        Ok(())
    }

    async fn mutate(
        &self,
        session: &Session,
        document: &'static str,
        variables: Value,
        field: &str,
        empty_message: &'static str,
    ) -> Result<Value, ClientError> {
        run_mutation(
            self.transport.as_ref(),
            session,
            document,
            variables,
            field,
            empty_message,
        )
        .await
    }

    /// The mutation itself already succeeded; a failed refetch only leaves
    /// the snapshot stale.
    async fn refetch_after_mutation(&self, session: &Session) {
        if let Err(err) = self.refresh(session).await {
            warn!(error = %err, "Refetch after mutation failed");
        }
    }
}

/// Client for the tag set attached to one generation.
pub struct GenerationTags {
    transport: Arc<dyn GraphqlTransport>,
    cache: QueryCache,
    generation_id: String,
    tags: Mutex<Vec<Tag>>,
}

impl GenerationTags {
    pub fn new(transport: Arc<dyn GraphqlTransport>, generation_id: impl Into<String>) -> Self {
        Self {
            transport,
            cache: QueryCache::default(),
            generation_id: generation_id.into(),
            tags: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the generation's tags.
    pub fn tags(&self) -> Vec<Tag> {
        self.tags.lock().map(|tags| tags.clone()).unwrap_or_default()
    }

    /// Whether the snapshot contains the given tag.
    pub fn has_tag(&self, tag_id: Uuid) -> bool {
        self.tags().iter().any(|tag| tag.id == tag_id)
    }

    fn require_generation_id(&self) -> Result<&str, ClientError> {
        if self.generation_id.is_empty() {
            return Err(ClientError::MissingGenerationId);
        }
        Ok(&self.generation_id)
    }

    /// Fetch the generation's tags. Without a generation id the read is
    /// suspended: the result is empty and no request is made.
    pub async fn list(&self, session: &Session) -> Result<Vec<Tag>, ClientError> {
        self.fetch(session, RequestPolicy::CacheAndNetwork).await
    }

    /// Fetch the generation's tags over the network unconditionally.
    pub async fn refresh(&self, session: &Session) -> Result<Vec<Tag>, ClientError> {
        self.fetch(session, RequestPolicy::NetworkOnly).await
    }

    async fn fetch(
        &self,
        session: &Session,
        policy: RequestPolicy,
    ) -> Result<Vec<Tag>, ClientError> {
        if self.generation_id.is_empty() {
            return Ok(Vec::new());
        }
        let data = run_query(
            self.transport.as_ref(),
            &self.cache,
            session,
            operations::GET_GENERATION_TAGS,
            json!({ "id": self.generation_id }),
            policy,
        )
        .await?;

        let tags: Vec<Tag> = match data.pointer("/generation/tags") {
            Some(Value::Null) | None => Vec::new(),
            Some(value) => decode(value.clone())?,
        };

        if let Ok(mut snapshot) = self.tags.lock() {
            *snapshot = tags.clone();
        }
        Ok(tags)
    }

    /// Attach a tag to the generation, then refetch its tag set.
    pub async fn add_tag(&self, session: &Session, tag_id: Uuid) -> Result<Tag, ClientError> {
        let generation_id = self.require_generation_id()?.to_string();
        let payload = self
            .mutate(
                session,
                operations::ADD_TAG_TO_GENERATION,
                json!({ "generationId": generation_id, "tagId": tag_id }),
                "addTagToGeneration",
                "Failed to add tag to generation",
            )
            .await?;
        let tag: Tag = decode(payload)?;
        self.refetch_after_mutation(session).await;
        Ok(tag)
    }

    /// Detach a tag from the generation, then refetch its tag set.
    pub async fn remove_tag(&self, session: &Session, tag_id: Uuid) -> Result<(), ClientError> {
        let generation_id = self.require_generation_id()?.to_string();
        self.mutate(
            session,
            operations::REMOVE_TAG_FROM_GENERATION,
            json!({ "generationId": generation_id, "tagId": tag_id }),
            "removeTagFromGeneration",
            "Failed to remove tag from generation",
        )
        .await?;
        self.refetch_after_mutation(session).await;
        Ok(())
    }

    async fn mutate(
        &self,
        session: &Session,
        document: &'static str,
        variables: Value,
        field: &str,
        empty_message: &'static str,
    ) -> Result<Value, ClientError> {
        run_mutation(
            self.transport.as_ref(),
            session,
            document,
            variables,
            field,
            empty_message,
        )
        .await
    }

    async fn refetch_after_mutation(&self, session: &Session) {
        if let Err(err) = self.refresh(session).await {
            warn!(error = %err, "Refetch after mutation failed");
        }
    }
}
