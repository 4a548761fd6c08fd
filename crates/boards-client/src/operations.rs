//! GraphQL documents for the tag operations.
//!
//! Every document selects the full tag shape so cached pages and mutation
//! payloads deserialize into the same [`domain::models::Tag`] type.

pub const GET_TAGS: &str = r#"
query GetTags($limit: Int, $offset: Int) {
  tags(limit: $limit, offset: $offset) {
    ...TagFields
  }
}
fragment TagFields on Tag {
  id
  tenantId
  name
  slug
  description
  metadata
  createdAt
  updatedAt
}
"#;

pub const GET_TAG: &str = r#"
query GetTag($id: ID!) {
  tag(id: $id) {
    ...TagFields
  }
}
fragment TagFields on Tag {
  id
  tenantId
  name
  slug
  description
  metadata
  createdAt
  updatedAt
}
"#;

pub const GET_TAG_BY_SLUG: &str = r#"
query GetTagBySlug($slug: String!) {
  tagBySlug(slug: $slug) {
    ...TagFields
  }
}
fragment TagFields on Tag {
  id
  tenantId
  name
  slug
  description
  metadata
  createdAt
  updatedAt
}
"#;

pub const GET_GENERATION_TAGS: &str = r#"
query GetGenerationTags($id: ID!) {
  generation(id: $id) {
    id
    tags {
      ...TagFields
    }
  }
}
fragment TagFields on Tag {
  id
  tenantId
  name
  slug
  description
  metadata
  createdAt
  updatedAt
}
"#;

pub const CREATE_TAG: &str = r#"
mutation CreateTag($input: CreateTagInput!) {
  createTag(input: $input) {
    ...TagFields
  }
}
fragment TagFields on Tag {
  id
  tenantId
  name
  slug
  description
  metadata
  createdAt
  updatedAt
}
"#;

pub const UPDATE_TAG: &str = r#"
mutation UpdateTag($input: UpdateTagInput!) {
  updateTag(input: $input) {
    ...TagFields
  }
}
fragment TagFields on Tag {
  id
  tenantId
  name
  slug
  description
  metadata
  createdAt
  updatedAt
}
"#;

pub const DELETE_TAG: &str = r#"
mutation DeleteTag($id: ID!) {
  deleteTag(id: $id)
}
"#;

pub const ADD_TAG_TO_GENERATION: &str = r#"
mutation AddTagToGeneration($generationId: ID!, $tagId: ID!) {
  addTagToGeneration(generationId: $generationId, tagId: $tagId) {
    ...TagFields
  }
}
fragment TagFields on Tag {
  id
  tenantId
  name
  slug
  description
  metadata
  createdAt
  updatedAt
}
"#;

pub const REMOVE_TAG_FROM_GENERATION: &str = r#"
mutation RemoveTagFromGeneration($generationId: ID!, $tagId: ID!) {
  removeTagFromGeneration(generationId: $generationId, tagId: $tagId)
}
"#;
