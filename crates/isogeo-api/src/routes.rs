// Generic CRUD routes
//
// Every entity family is described by a `Resource` route table; the six
// operations (list, get, create, update, delete, exists) are written once
// over that table. Scope is either user-wide or one parent entity, set with
// `Routes::under`.

use std::marker::PhantomData;

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::CacheScope;
use crate::checker::{self, Checked};
use crate::error::Error;
use crate::model::{
    Condition, Contact, Dict, Entity, License, Metadata, Share, Specification, Workgroup,
    name_at, to_dict_creation,
};
use crate::outcome::Outcome;
use crate::session::Session;

// ── Route tables ────────────────────────────────────────────────────

/// Route table of an entity family.
///
/// Templates use `{parent}` and `{id}` placeholders. A template containing
/// `{parent}` can only be used under a parent scope.
pub trait Resource: Entity {
    /// Collection listed without a parent.
    const USER_COLLECTION: Option<&'static str>;
    /// Collection listed under a parent.
    const PARENT_COLLECTION: Option<&'static str>;
    /// Single item.
    const ITEM: &'static str;
    /// Collection POSTed to on create.
    const CREATE: &'static str;
    /// Sub-resources requested on get.
    const DEFAULT_INCLUDE: &'static [&'static str];
    /// Path to the display name in a listed item, for families that are cached.
    const NAME_PATH: Option<&'static [&'static str]>;
    /// Kind of the parent entity, used in validation messages.
    const PARENT_KIND: &'static str = "Workgroup";

    /// Record the scope an entity was read from or created under.
    fn attach_parent(&mut self, _parent: &str) {}
}

impl Resource for Share {
    const USER_COLLECTION: Option<&'static str> = Some("shares");
    const PARENT_COLLECTION: Option<&'static str> = Some("groups/{parent}/shares");
    const ITEM: &'static str = "shares/{id}";
    const CREATE: &'static str = "shares";
    const DEFAULT_INCLUDE: &'static [&'static str] = &["_abilities", "groups"];
    const NAME_PATH: Option<&'static [&'static str]> = Some(&["name"]);
}

impl Resource for Workgroup {
    const USER_COLLECTION: Option<&'static str> = Some("groups");
    const PARENT_COLLECTION: Option<&'static str> = None;
    const ITEM: &'static str = "groups/{id}";
    const CREATE: &'static str = "groups";
    const DEFAULT_INCLUDE: &'static [&'static str] = &["_abilities", "limits"];
    const NAME_PATH: Option<&'static [&'static str]> = Some(&["contact", "name"]);
}

impl Resource for Specification {
    const USER_COLLECTION: Option<&'static str> = Some("specifications");
    const PARENT_COLLECTION: Option<&'static str> = Some("groups/{parent}/specifications");
    const ITEM: &'static str = "specifications/{id}";
    const CREATE: &'static str = "groups/{parent}/specifications";
    const DEFAULT_INCLUDE: &'static [&'static str] = &["_abilities", "count"];
    const NAME_PATH: Option<&'static [&'static str]> = Some(&["name"]);
}

impl Resource for License {
    const USER_COLLECTION: Option<&'static str> = Some("licenses");
    const PARENT_COLLECTION: Option<&'static str> = Some("groups/{parent}/licenses");
    const ITEM: &'static str = "licenses/{id}";
    const CREATE: &'static str = "groups/{parent}/licenses";
    const DEFAULT_INCLUDE: &'static [&'static str] = &["_abilities", "count"];
    const NAME_PATH: Option<&'static [&'static str]> = Some(&["name"]);
}

impl Resource for Contact {
    const USER_COLLECTION: Option<&'static str> = None;
    const PARENT_COLLECTION: Option<&'static str> = Some("groups/{parent}/contacts");
    const ITEM: &'static str = "contacts/{id}";
    const CREATE: &'static str = "groups/{parent}/contacts";
    const DEFAULT_INCLUDE: &'static [&'static str] = &["_abilities", "count"];
    const NAME_PATH: Option<&'static [&'static str]> = Some(&["name"]);
}

impl Resource for Metadata {
    const USER_COLLECTION: Option<&'static str> = None;
    const PARENT_COLLECTION: Option<&'static str> = None;
    const ITEM: &'static str = "resources/{id}";
    const CREATE: &'static str = "groups/{parent}/resources";
    const DEFAULT_INCLUDE: &'static [&'static str] = &["_creator", "events", "limitations"];
    const NAME_PATH: Option<&'static [&'static str]> = None;
}

impl Resource for Condition {
    const USER_COLLECTION: Option<&'static str> = None;
    const PARENT_COLLECTION: Option<&'static str> = Some("resources/{parent}/conditions");
    const ITEM: &'static str = "resources/{parent}/conditions/{id}";
    const CREATE: &'static str = "resources/{parent}/conditions";
    const DEFAULT_INCLUDE: &'static [&'static str] = &[];
    const NAME_PATH: Option<&'static [&'static str]> = None;
    const PARENT_KIND: &'static str = "Metadata";

    fn attach_parent(&mut self, parent: &str) {
        self.parent_resource = Some(parent.to_owned());
    }
}

// ── Options and envelopes ───────────────────────────────────────────

/// Options of a list call.
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Sub-resources to include; `None` uses the family's default.
    pub include: Option<Vec<String>>,
    /// Rebuild the scope's name→id index from the result.
    pub caching: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            include: None,
            caching: true,
        }
    }
}

impl ListOptions {
    pub fn include<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn without_caching(mut self) -> Self {
        self.caching = false;
        self
    }
}

/// One page of a metadata search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchPage<T> {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Largest page the search endpoint serves.
pub const MAX_PAGE_SIZE: u32 = 100;

// ── Routes ──────────────────────────────────────────────────────────

/// CRUD operations of one entity family, scoped to the user or a parent.
pub struct Routes<'s, E> {
    session: &'s mut Session,
    parent: Option<String>,
    entity: PhantomData<E>,
}

impl Session {
    pub fn routes<E: Resource>(&mut self) -> Routes<'_, E> {
        Routes {
            session: self,
            parent: None,
            entity: PhantomData,
        }
    }

    pub fn shares(&mut self) -> Routes<'_, Share> {
        self.routes()
    }

    pub fn workgroups(&mut self) -> Routes<'_, Workgroup> {
        self.routes()
    }

    pub fn specifications(&mut self) -> Routes<'_, Specification> {
        self.routes()
    }

    pub fn licenses(&mut self) -> Routes<'_, License> {
        self.routes()
    }

    pub fn contacts(&mut self) -> Routes<'_, Contact> {
        self.routes()
    }

    pub fn metadata(&mut self) -> Routes<'_, Metadata> {
        self.routes()
    }

    pub fn conditions(&mut self) -> Routes<'_, Condition> {
        self.routes()
    }
}

impl<E: Resource> Routes<'_, E> {
    /// Scope the routes to a parent (workgroup, or metadata for conditions).
    pub fn under(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    fn scope(&self) -> CacheScope {
        self.parent
            .clone()
            .map_or(CacheScope::User, CacheScope::Parent)
    }

    /// Fill a route template, validating every id it needs.
    fn render(&self, template: &str, id: Option<&str>) -> Result<String, Error> {
        let mut route = template.to_owned();
        if template.contains("{parent}") {
            let parent = self.parent.as_deref().ok_or_else(|| {
                Error::validation(format!(
                    "{} route {template} requires a parent {}",
                    E::KIND,
                    E::PARENT_KIND
                ))
            })?;
            checker::ensure_uuid(parent, E::PARENT_KIND)?;
            route = route.replace("{parent}", parent);
        }
        if let Some(id) = id {
            checker::ensure_uuid(id, E::KIND)?;
            route = route.replace("{id}", id);
        }
        Ok(route)
    }

    fn collection(&self) -> Result<String, Error> {
        let template = if self.parent.is_some() {
            E::PARENT_COLLECTION
        } else {
            E::USER_COLLECTION
        };
        match template {
            Some(template) => self.render(template, None),
            None if self.parent.is_none() && E::PARENT_COLLECTION.is_some() => {
                Err(Error::validation(format!(
                    "listing {} requires a parent {}",
                    E::KIND,
                    E::PARENT_KIND
                )))
            }
            None => Err(Error::Unsupported(if self.parent.is_some() {
                "listing under a parent"
            } else {
                "listing without a parent"
            })),
        }
    }

    fn entity_from(&self, mut entity: E) -> E {
        if let Some(parent) = &self.parent {
            entity.attach_parent(parent);
        }
        entity
    }

    // ── Operations ───────────────────────────────────────────────────

    /// List the scope's entities as raw mappings.
    pub async fn list(&mut self, options: &ListOptions) -> Result<Outcome<Vec<Dict>>, Error> {
        let route = self.collection()?;
        let include = match &options.include {
            Some(fields) => fields.join(","),
            None => E::DEFAULT_INCLUDE.join(","),
        };
        let query = include_query(include);

        let items: Vec<Dict> = match self
            .session
            .send(Method::GET, &route, &query, None)
            .await?
        {
            Checked::Passed(resp) => Session::decode(resp).await?,
            Checked::NotFound => return Ok(Outcome::NotFound),
            Checked::Conflict(message) => return Ok(Outcome::Conflict(message)),
        };

        if let (true, Some(path)) = (options.caching, E::NAME_PATH) {
            let entries: Vec<(String, String)> = items
                .iter()
                .filter_map(|item| {
                    let name = name_at(item, path)?;
                    let id = item.get("_id")?.as_str()?;
                    Some((name.to_owned(), id.to_owned()))
                })
                .collect();
            debug!(kind = E::KIND, count = entries.len(), "name index rebuilt");
            let scope = self.scope();
            self.session.cache_mut().replace(E::KIND, scope, entries);
        }

        Ok(Outcome::Success(items))
    }

    /// Fetch one entity with the family's default sub-resources.
    pub async fn get(&mut self, id: &str) -> Result<Outcome<E>, Error> {
        self.get_with(id, E::DEFAULT_INCLUDE).await
    }

    /// Fetch one entity with an explicit `_include` list.
    pub async fn get_with(&mut self, id: &str, include: &[&str]) -> Result<Outcome<E>, Error> {
        let route = self.render(E::ITEM, Some(id))?;
        let query = include_query(include.join(","));

        match self.session.send(Method::GET, &route, &query, None).await? {
            Checked::Passed(resp) => {
                let entity: E = Session::decode(resp).await?;
                Ok(Outcome::Success(self.entity_from(entity)))
            }
            Checked::NotFound => Ok(Outcome::NotFound),
            Checked::Conflict(message) => Ok(Outcome::Conflict(message)),
        }
    }

    /// Create `entity` in the current scope.
    ///
    /// With `check_exists`, a name already present in the scope's index
    /// (listed first if the index is empty) returns
    /// [`Outcome::AlreadyExists`] and nothing is POSTed.
    ///
    /// Families created at user level (shares, workgroups) refuse a parent,
    /// so the index checked is always the one the new entity lands in.
    pub async fn create(&mut self, entity: &E, check_exists: bool) -> Result<Outcome<E>, Error> {
        entity.validate_creation()?;
        if self.parent.is_some() && !E::CREATE.contains("{parent}") {
            return Err(Error::validation(format!(
                "{} is created at user level ({}), not under a {}",
                E::KIND,
                E::CREATE,
                E::PARENT_KIND
            )));
        }
        let route = self.render(E::CREATE, None)?;

        if check_exists && E::NAME_PATH.is_some() {
            if let Some(name) = entity.display_name() {
                let scope = self.scope();
                if self.session.cache().is_empty(E::KIND, &scope) {
                    let listed = self.list(&ListOptions::default()).await?;
                    if !listed.is_success() {
                        debug!(
                            kind = E::KIND,
                            outcome = ?listed,
                            "duplicate check listing failed, creating anyway"
                        );
                    }
                }
                if let Some(id) = self.session.cache().lookup(E::KIND, &scope, name) {
                    warn!(kind = E::KIND, name, id, "already exists, create skipped");
                    return Ok(Outcome::AlreadyExists {
                        name: name.to_owned(),
                        id: id.to_owned(),
                    });
                }
            }
        }

        let body = Value::Object(to_dict_creation(entity)?);
        match self
            .session
            .send(Method::POST, &route, &[], Some(&body))
            .await?
        {
            Checked::Passed(resp) => {
                let created = self.entity_from(Session::decode(resp).await?);
                self.remember(&created);
                Ok(Outcome::Success(created))
            }
            Checked::NotFound => Ok(Outcome::NotFound),
            Checked::Conflict(message) => Ok(Outcome::Conflict(message)),
        }
    }

    /// Replace the server copy of `entity` with its creation-shaped body.
    pub async fn update(&mut self, entity: &E, caching: bool) -> Result<Outcome<E>, Error> {
        let id = entity
            .id()
            .ok_or_else(|| Error::validation(format!("{} has no id to update", E::KIND)))?;
        let route = self.render(E::ITEM, Some(id))?;
        let body = Value::Object(to_dict_creation(entity)?);

        match self
            .session
            .send(Method::PUT, &route, &[], Some(&body))
            .await?
        {
            Checked::Passed(resp) => {
                let updated = self.entity_from(Session::decode(resp).await?);
                if caching {
                    self.remember(&updated);
                }
                Ok(Outcome::Success(updated))
            }
            Checked::NotFound => Ok(Outcome::NotFound),
            Checked::Conflict(message) => Ok(Outcome::Conflict(message)),
        }
    }

    /// Delete an entity. On success its id leaves every index of the family.
    pub async fn delete(&mut self, id: &str) -> Result<Outcome<StatusCode>, Error> {
        let route = self.render(E::ITEM, Some(id))?;

        match self.session.send(Method::DELETE, &route, &[], None).await? {
            Checked::Passed(resp) => {
                let removed = self.session.cache_mut().remove_id(E::KIND, id);
                debug!(kind = E::KIND, id, removed, "deleted");
                Ok(Outcome::Success(resp.status()))
            }
            Checked::NotFound => Ok(Outcome::NotFound),
            Checked::Conflict(message) => Ok(Outcome::Conflict(message)),
        }
    }

    /// Whether the entity is visible to the session's user.
    pub async fn exists(&mut self, id: &str) -> Result<bool, Error> {
        let route = self.render(E::ITEM, Some(id))?;
        match self.session.send(Method::GET, &route, &[], None).await? {
            Checked::Passed(_) => Ok(true),
            Checked::NotFound | Checked::Conflict(_) => Ok(false),
        }
    }

    fn remember(&mut self, entity: &E) {
        if E::NAME_PATH.is_none() {
            return;
        }
        if let (Some(name), Some(id)) = (entity.display_name(), entity.id()) {
            let scope = self.scope();
            self.session.cache_mut().insert(E::KIND, scope, name, id);
        }
    }
}

impl Routes<'_, Metadata> {
    /// One page of the metadata owned by workgroup `workgroup_id`.
    pub async fn search_in_workgroup(
        &mut self,
        workgroup_id: &str,
        page_size: u32,
        offset: u32,
    ) -> Result<Outcome<SearchPage<Metadata>>, Error> {
        checker::ensure_uuid(workgroup_id, "Workgroup")?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(Error::validation(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        let route = format!("groups/{workgroup_id}/resources/search");
        let query = [
            ("_limit", page_size.to_string()),
            ("_offset", offset.to_string()),
        ];

        match self
            .session
            .send(Method::GET, &route, &query, None)
            .await?
        {
            Checked::Passed(resp) => Ok(Outcome::Success(Session::decode(resp).await?)),
            Checked::NotFound => Ok(Outcome::NotFound),
            Checked::Conflict(message) => Ok(Outcome::Conflict(message)),
        }
    }
}

fn include_query(include: String) -> Vec<(&'static str, String)> {
    if include.is_empty() {
        Vec::new()
    } else {
        vec![("_include", include)]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::auth::{Credentials, Endpoints};

    fn session() -> Session {
        Session::with_client(
            reqwest::Client::new(),
            Endpoints::default(),
            Credentials::ClientCredentials {
                client_id: "id".into(),
                client_secret: SecretString::from("secret".to_owned()),
            },
        )
    }

    const WG: &str = "32f7e95ec4e94ca3bc1afda960003882";

    #[test]
    fn render_fills_parent_and_id() {
        let mut s = session();
        let routes = s.conditions().under("9f6b2c1a0e8d4b7c9a6f5e4d3c2b1a00");
        assert_eq!(
            routes
                .render(Condition::ITEM, Some("5e3c8f6a0b1d4c2e9a7f6b5d4c3b2a19"))
                .unwrap(),
            "resources/9f6b2c1a0e8d4b7c9a6f5e4d3c2b1a00/conditions/5e3c8f6a0b1d4c2e9a7f6b5d4c3b2a19"
        );
    }

    #[test]
    fn parent_templates_need_a_parent() {
        let mut s = session();
        let err = s.licenses().render(License::CREATE, None).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Workgroup"));

        let err = s.licenses().under("not-a-uuid").collection().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn collections_per_scope() {
        let mut s = session();
        assert_eq!(s.shares().collection().unwrap(), "shares");
        assert_eq!(
            s.shares().under(WG).collection().unwrap(),
            format!("groups/{WG}/shares")
        );
        assert!(s.contacts().collection().unwrap_err().is_validation());
        assert!(matches!(
            s.workgroups().under(WG).collection(),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(s.metadata().collection(), Err(Error::Unsupported(_))));
    }

    #[test]
    fn include_query_skips_empty_list() {
        assert!(include_query(String::new()).is_empty());
        assert_eq!(
            include_query(Share::DEFAULT_INCLUDE.join(",")),
            vec![("_include", "_abilities,groups".to_owned())]
        );
    }

    #[test]
    fn condition_records_its_metadata() {
        let mut s = session();
        let routes = s.conditions().under("9f6b2c1a0e8d4b7c9a6f5e4d3c2b1a00");
        let condition = routes.entity_from(Condition::default());
        assert_eq!(
            condition.parent_resource.as_deref(),
            Some("9f6b2c1a0e8d4b7c9a6f5e4d3c2b1a00")
        );
    }

    #[test]
    fn search_page_tolerates_missing_counters() {
        let page: SearchPage<Metadata> =
            serde_json::from_str(r#"{"results":[{"title":"Roads"}]}"#).unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.results[0].title.as_deref(), Some("Roads"));
    }
}
