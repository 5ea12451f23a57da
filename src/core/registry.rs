// local <-> remote id pairing per model
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::core::error::SerializerError;
use crate::core::types::{LocalId, RemoteId};

//Rules:
//1. per model, a local id pairs with at most one remote id and vice versa.
//2. a pairing, once registered, never changes. Repeating it is a no-op.
//3. a contradicting pairing is rejected, never overwritten.
//4. generated local ids are fresh: above every id generated or registered so far.

#[derive(Debug, Default)]
struct ModelIds {
    local_to_remote: HashMap<LocalId, RemoteId>,
    remote_to_local: HashMap<RemoteId, LocalId>,
}

#[derive(Debug)]
pub struct IdRegistry {
    models: HashMap<String, ModelIds>,
    next: u64,
}

impl Default for IdRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IdRegistry {
    pub fn new() -> Self {
        Self { models: HashMap::new(), next: 1 }
    }

    /// Remote id paired with `local`, or `None` if it was never registered.
    pub fn local_to_remote(&self, model: &str, local: LocalId) -> Option<&RemoteId> {
        self.models.get(model)?.local_to_remote.get(&local)
    }

    pub fn remote_to_local(&self, model: &str, remote: &RemoteId) -> Option<LocalId> {
        self.models.get(model)?.remote_to_local.get(remote).copied()
    }

    pub fn register(&mut self, model: &str, local: LocalId, remote: RemoteId) -> Result<(), SerializerError> {
        let ids = self.models.entry(model.to_string()).or_default();

        match (ids.local_to_remote.get(&local), ids.remote_to_local.get(&remote).copied()) {
            (Some(existing), _) if *existing != remote => {
                let err = SerializerError::LocalAlreadyPaired {
                    model: model.to_string(),
                    local,
                    existing: existing.clone(),
                    remote,
                };
                warn!(error = %err, "rejected id registration");
                Err(err)
            }
            (_, Some(existing)) if existing != local => {
                let err = SerializerError::RemoteAlreadyPaired {
                    model: model.to_string(),
                    remote,
                    existing,
                    local,
                };
                warn!(error = %err, "rejected id registration");
                Err(err)
            }
            (Some(_), Some(_)) => Ok(()), //same pairing again
            _ => {
                //the counter must stay above every registered id
                let Some(after) = local.0.checked_add(1) else {
                    return Err(SerializerError::LocalIdOutOfRange { model: model.to_string(), local });
                };
                ids.local_to_remote.insert(local, remote.clone());
                ids.remote_to_local.insert(remote, local);
                self.next = self.next.max(after);
                Ok(())
            }
        }
    }

    pub fn generate_local_id(&mut self) -> LocalId {
        let id = LocalId(self.next);
        self.next += 1;
        id
    }

    /// Local id for `remote`, generating and registering one on first sight.
    pub fn resolve_or_generate(&mut self, model: &str, remote: &RemoteId) -> Result<LocalId, SerializerError> {
        if let Some(local) = self.remote_to_local(model, remote) {
            return Ok(local);
        }
        let local = self.generate_local_id();
        self.register(model, local, remote.clone())?;
        debug!(model, %remote, %local, "generated local id for unseen remote id");
        Ok(local)
    }

    pub fn contains_local(&self, model: &str, local: LocalId) -> bool {
        self.local_to_remote(model, local).is_some()
    }

    pub fn contains_remote(&self, model: &str, remote: &RemoteId) -> bool {
        self.remote_to_local(model, remote).is_some()
    }

    pub fn len(&self, model: &str) -> usize {
        self.models.get(model).map_or(0, |ids| ids.local_to_remote.len())
    }

    pub fn is_empty(&self) -> bool {
        self.models.values().all(|ids| ids.local_to_remote.is_empty())
    }

    //for reports
    pub fn iter_pairs<'a>(&'a self, model: &str) -> impl Iterator<Item = (LocalId, &'a RemoteId)> + use<'a> {
        self.models
            .get(model)
            .into_iter()
            .flat_map(|ids| ids.local_to_remote.iter().map(|(&l, r)| (l, r)))
    }
}

/// Registry handle shared between concurrent passes.
///
/// A pass holds the lock for its whole traversal, so generation and
/// registration from different payloads never interleave.
#[derive(Debug, Clone, Default)]
pub struct SharedIdRegistry {
    inner: Arc<Mutex<IdRegistry>>,
}

impl SharedIdRegistry {
    pub fn new(registry: IdRegistry) -> Self {
        Self { inner: Arc::new(Mutex::new(registry)) }
    }

    pub fn lock(&self) -> MutexGuard<'_, IdRegistry> {
        //every registry operation leaves the maps consistent, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
