//! Command reconciliation
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation
//!
//! Keeps the remote command registry in line with the locally declared
//! definitions. Each scope namespace (global, and each guild) is
//! reconciled independently: fetch the remote snapshot once, diff it
//! against the local set with [`commands_equal`], then either apply the
//! diff entry by entry (incremental) or replace the whole set in one
//! call (bulk), depending on how many edits the diff needs.
//!
//! Incremental edits leave matching commands untouched, so users see no
//! flicker on unchanged entries, but every edit is one request; past
//! [`COMMAND_MERGE_LIMIT`] edits a single bulk replace is cheaper. An
//! empty remote snapshot always takes the bulk path.
//!
//! A failed request aborts the remaining work for that call. Completed
//! mutations stay in place; the next run starts from a fresh snapshot,
//! so reconciliation needs no bookkeeping between attempts.

use std::collections::HashSet;

use anyhow::Result;
use futures::future::{try_join, try_join_all};
use log::{debug, info};
use serenity::model::id::GuildId;

use super::api::{CommandsApi, RemoteCommand};
use super::compare::commands_equal;
use super::definition::{CommandDefinition, CommandScope};

/// Edit budget per sync: once a diff needs this many create/delete
/// requests, the whole scope is bulk-replaced instead.
pub const COMMAND_MERGE_LIMIT: usize = 10;

pub struct Synchronizer<A: CommandsApi> {
    api: A,
    merge_limit: usize,
}

impl<A: CommandsApi> Synchronizer<A> {
    pub fn new(api: A) -> Self {
        Synchronizer {
            api,
            merge_limit: COMMAND_MERGE_LIMIT,
        }
    }

    pub fn with_merge_limit(mut self, merge_limit: usize) -> Self {
        self.merge_limit = merge_limit;
        self
    }

    /// Reconcile both partitions: the global namespace and every guild
    /// appearing in the local set.
    pub async fn sync_all(&self, definitions: &[CommandDefinition]) -> Result<()> {
        tokio::try_join!(
            self.sync_global(definitions),
            self.sync_guilds(definitions, None)
        )?;
        Ok(())
    }

    /// Reconcile the global namespace against the global-scoped subset
    /// of `definitions`.
    pub async fn sync_global(&self, definitions: &[CommandDefinition]) -> Result<()> {
        let local: Vec<&CommandDefinition> = definitions
            .iter()
            .filter(|definition| definition.scope == CommandScope::Global)
            .collect();
        self.reconcile(CommandScope::Global, &local).await
    }

    /// Reconcile guild namespaces. Guilds are taken from `guild_ids`
    /// when supplied, otherwise from the guild-scoped definitions
    /// themselves; guilds with no local definitions are left alone.
    pub async fn sync_guilds(
        &self,
        definitions: &[CommandDefinition],
        guild_ids: Option<&[GuildId]>,
    ) -> Result<()> {
        let guild_ids: Vec<GuildId> = match guild_ids {
            Some(ids) => ids.to_vec(),
            None => {
                let mut seen = HashSet::new();
                definitions
                    .iter()
                    .filter_map(|definition| match definition.scope {
                        CommandScope::Guild(guild_id) => Some(guild_id),
                        CommandScope::Global => None,
                    })
                    .filter(|guild_id| seen.insert(*guild_id))
                    .collect()
            }
        };

        try_join_all(guild_ids.into_iter().map(|guild_id| {
            let scope = CommandScope::Guild(guild_id);
            let local: Vec<&CommandDefinition> = definitions
                .iter()
                .filter(|definition| definition.scope == scope)
                .collect();
            async move { self.reconcile(scope, &local).await }
        }))
        .await?;
        Ok(())
    }

    async fn reconcile(&self, scope: CommandScope, local: &[&CommandDefinition]) -> Result<()> {
        let registered = self.api.fetch_all(&scope).await?;

        let to_delete: Vec<&RemoteCommand> = registered
            .iter()
            .filter(|remote| {
                local
                    .iter()
                    .all(|definition| !commands_equal(Some(definition), Some(&remote.definition)))
            })
            .collect();
        let to_create: Vec<&CommandDefinition> = local
            .iter()
            .filter(|definition| {
                !registered
                    .iter()
                    .any(|remote| commands_equal(Some(definition), Some(&remote.definition)))
            })
            .copied()
            .collect();

        if !registered.is_empty() && to_delete.len() + to_create.len() < self.merge_limit {
            let deletes = try_join_all(to_delete.iter().map(|remote| async move {
                self.api.delete(&scope, remote.id).await?;
                debug!("Deleted command '{}' ({scope})", remote.definition.name);
                Ok::<(), anyhow::Error>(())
            }));
            let creates = try_join_all(to_create.iter().map(|definition| async move {
                self.api.create(&scope, definition).await?;
                debug!("Created command '{}' ({scope})", definition.name);
                Ok::<(), anyhow::Error>(())
            }));
            try_join(deletes, creates).await?;
            info!(
                "Synced commands ({scope}): {} deleted, {} created",
                to_delete.len(),
                to_create.len()
            );
        } else {
            let replacement: Vec<CommandDefinition> = to_create
                .iter()
                .map(|definition| (*definition).clone())
                .collect();
            self.api.bulk_set(&scope, &replacement).await?;
            info!(
                "Replaced command set ({scope}): {} commands",
                replacement.len()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use anyhow::bail;
    use async_trait::async_trait;
    use serenity::model::id::CommandId;

    #[derive(Default)]
    struct MockState {
        remote: Mutex<HashMap<CommandScope, Vec<RemoteCommand>>>,
        creates: AtomicUsize,
        deletes: AtomicUsize,
        bulk_sets: AtomicUsize,
        fetches: AtomicUsize,
        next_id: AtomicU64,
        fail_creates: std::sync::atomic::AtomicBool,
    }

    // In-memory registry double; mutations behave like the real service
    // so re-running sync observes the previous run's effects.
    #[derive(Clone, Default)]
    struct MockApi {
        state: Arc<MockState>,
    }

    impl MockApi {
        fn seed(&self, scope: CommandScope, definitions: &[CommandDefinition]) {
            let records = definitions
                .iter()
                .map(|definition| self.record(definition))
                .collect();
            self.state.remote.lock().unwrap().insert(scope, records);
        }

        fn record(&self, definition: &CommandDefinition) -> RemoteCommand {
            RemoteCommand {
                id: CommandId(self.state.next_id.fetch_add(1, Ordering::SeqCst) + 1),
                definition: definition.clone(),
            }
        }

        fn remote_names(&self, scope: CommandScope) -> Vec<String> {
            self.state
                .remote
                .lock()
                .unwrap()
                .get(&scope)
                .map(|records| {
                    records
                        .iter()
                        .map(|record| record.definition.name.clone())
                        .collect()
                })
                .unwrap_or_default()
        }

        fn counts(&self) -> (usize, usize, usize) {
            (
                self.state.deletes.load(Ordering::SeqCst),
                self.state.creates.load(Ordering::SeqCst),
                self.state.bulk_sets.load(Ordering::SeqCst),
            )
        }

        fn fail_creates(&self) {
            self.state
                .fail_creates
                .store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl CommandsApi for MockApi {
        async fn fetch_all(&self, scope: &CommandScope) -> Result<Vec<RemoteCommand>> {
            self.state.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .state
                .remote
                .lock()
                .unwrap()
                .get(scope)
                .cloned()
                .unwrap_or_default())
        }

        async fn create(
            &self,
            scope: &CommandScope,
            definition: &CommandDefinition,
        ) -> Result<RemoteCommand> {
            if self.state.fail_creates.load(Ordering::SeqCst) {
                bail!("create rejected");
            }
            self.state.creates.fetch_add(1, Ordering::SeqCst);
            let record = self.record(definition);
            self.state
                .remote
                .lock()
                .unwrap()
                .entry(*scope)
                .or_default()
                .push(record.clone());
            Ok(record)
        }

        async fn delete(&self, scope: &CommandScope, id: CommandId) -> Result<()> {
            self.state.deletes.fetch_add(1, Ordering::SeqCst);
            if let Some(records) = self.state.remote.lock().unwrap().get_mut(scope) {
                records.retain(|record| record.id != id);
            }
            Ok(())
        }

        async fn bulk_set(
            &self,
            scope: &CommandScope,
            definitions: &[CommandDefinition],
        ) -> Result<Vec<RemoteCommand>> {
            self.state.bulk_sets.fetch_add(1, Ordering::SeqCst);
            let records: Vec<RemoteCommand> = definitions
                .iter()
                .map(|definition| self.record(definition))
                .collect();
            self.state
                .remote
                .lock()
                .unwrap()
                .insert(*scope, records.clone());
            Ok(records)
        }
    }

    fn definition(name: &str) -> CommandDefinition {
        CommandDefinition::new(name, format!("{name} description"))
    }

    #[tokio::test]
    async fn test_empty_remote_uses_bulk_replace() {
        let api = MockApi::default();
        let synchronizer = Synchronizer::new(api.clone());

        synchronizer
            .sync_global(&[definition("ping")])
            .await
            .unwrap();

        assert_eq!(api.counts(), (0, 0, 1));
        assert_eq!(api.remote_names(CommandScope::Global), vec!["ping"]);
    }

    #[tokio::test]
    async fn test_small_diff_uses_incremental_path() {
        let api = MockApi::default();
        api.seed(CommandScope::Global, &[definition("a")]);
        let synchronizer = Synchronizer::new(api.clone()).with_merge_limit(50);

        synchronizer
            .sync_global(&[definition("a"), definition("b")])
            .await
            .unwrap();

        assert_eq!(api.counts(), (0, 1, 0));
        let mut names = api.remote_names(CommandScope::Global);
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_changed_definition_deletes_and_recreates() {
        let api = MockApi::default();
        api.seed(CommandScope::Global, &[definition("ask")]);
        let synchronizer = Synchronizer::new(api.clone());

        let mut changed = definition("ask");
        changed.description = "Ask anything".to_string();
        synchronizer.sync_global(&[changed]).await.unwrap();

        assert_eq!(api.counts(), (1, 1, 0));
        assert_eq!(api.remote_names(CommandScope::Global), vec!["ask"]);
    }

    #[tokio::test]
    async fn test_diff_at_merge_limit_uses_bulk_replace() {
        let api = MockApi::default();
        api.seed(CommandScope::Global, &[definition("old")]);
        let synchronizer = Synchronizer::new(api.clone()).with_merge_limit(2);

        // One delete plus one create reaches the limit exactly.
        synchronizer
            .sync_global(&[definition("new")])
            .await
            .unwrap();

        assert_eq!(api.counts(), (0, 0, 1));
        assert_eq!(api.remote_names(CommandScope::Global), vec!["new"]);
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let api = MockApi::default();
        let local = [definition("a"), definition("b")];
        let synchronizer = Synchronizer::new(api.clone());

        synchronizer.sync_global(&local).await.unwrap();
        let after_first = api.counts();
        synchronizer.sync_global(&local).await.unwrap();

        // The second run found nothing to do.
        assert_eq!(api.counts(), after_first);
    }

    #[tokio::test]
    async fn test_guild_partitions_are_independent() {
        let api = MockApi::default();
        let synchronizer = Synchronizer::new(api.clone());
        let definitions = [
            definition("global-cmd"),
            definition("one").guild(GuildId(1)),
            definition("two").guild(GuildId(2)),
        ];

        synchronizer.sync_guilds(&definitions, None).await.unwrap();

        assert_eq!(
            api.remote_names(CommandScope::Guild(GuildId(1))),
            vec!["one"]
        );
        assert_eq!(
            api.remote_names(CommandScope::Guild(GuildId(2))),
            vec!["two"]
        );
        // The global namespace was never touched.
        assert!(api.remote_names(CommandScope::Global).is_empty());
        assert_eq!(api.state.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_explicit_guild_list_limits_partitions() {
        let api = MockApi::default();
        let synchronizer = Synchronizer::new(api.clone());
        let definitions = [
            definition("one").guild(GuildId(1)),
            definition("two").guild(GuildId(2)),
        ];

        synchronizer
            .sync_guilds(&definitions, Some(&[GuildId(1)]))
            .await
            .unwrap();

        assert_eq!(
            api.remote_names(CommandScope::Guild(GuildId(1))),
            vec!["one"]
        );
        assert!(api.remote_names(CommandScope::Guild(GuildId(2))).is_empty());
    }

    #[tokio::test]
    async fn test_sync_all_covers_both_partitions() {
        let api = MockApi::default();
        let synchronizer = Synchronizer::new(api.clone());
        let definitions = [definition("ping"), definition("local").guild(GuildId(5))];

        synchronizer.sync_all(&definitions).await.unwrap();

        assert_eq!(api.remote_names(CommandScope::Global), vec!["ping"]);
        assert_eq!(
            api.remote_names(CommandScope::Guild(GuildId(5))),
            vec!["local"]
        );
    }

    #[tokio::test]
    async fn test_create_failure_propagates() {
        let api = MockApi::default();
        api.seed(CommandScope::Global, &[definition("a")]);
        api.fail_creates();
        let synchronizer = Synchronizer::new(api.clone());

        let result = synchronizer
            .sync_global(&[definition("a"), definition("b")])
            .await;

        assert!(result.is_err());
    }
}
