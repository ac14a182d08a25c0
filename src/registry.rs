/// Site registry: the single source of truth for target-site patterns.
///
/// Holds an in-memory copy for the current extension context. Callers that
/// need patterns go through `load()` (fresh from storage) or `patterns()`
/// (last loaded copy); the copy is replaced wholesale, never edited in place,
/// and no borrow of it is held across an await.
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::MonitorResult;
use crate::host::{ChangeSignal, PatternStore};
use crate::storage::SiteList;

pub struct SiteRegistry {
    store: Rc<dyn PatternStore>,
    signal: Rc<dyn ChangeSignal>,
    key: String,
    defaults: Vec<String>,
    current: RefCell<SiteList>,
}

impl SiteRegistry {
    pub fn new(
        store: Rc<dyn PatternStore>,
        signal: Rc<dyn ChangeSignal>,
        key: &str,
        defaults: &[String],
    ) -> Self {
        SiteRegistry {
            store,
            signal,
            key: key.to_string(),
            defaults: defaults.to_vec(),
            current: RefCell::new(SiteList::new()),
        }
    }

    /// Read the stored list, seeding defaults on first run.
    ///
    /// A missing key is not an error; a failing read is.
    pub async fn load(&self) -> MonitorResult<Vec<String>> {
        let list = match self.store.read(&self.key).await? {
            Some(stored) => SiteList::from_raw(stored),
            None => {
                let defaults = SiteList::from_raw(&self.defaults);
                log::info!("Initializing default target sites in storage: {:?}", defaults.as_slice());
                if let Err(e) = self.store.write(&self.key, defaults.as_slice()).await {
                    log::warn!("Could not persist default target sites: {}", e);
                }
                defaults
            }
        };

        log::debug!("Loaded target sites: {:?}", list.as_slice());
        let patterns = list.as_slice().to_vec();
        *self.current.borrow_mut() = list;
        Ok(patterns)
    }

    /// Normalize, persist, then tell every other context to reload
    pub async fn replace(&self, patterns: &[String]) -> MonitorResult<Vec<String>> {
        let list = SiteList::from_raw(patterns);
        self.store.write(&self.key, list.as_slice()).await?;

        let saved = list.as_slice().to_vec();
        *self.current.borrow_mut() = list;

        if let Err(e) = self.signal.registry_changed().await {
            log::warn!("Target sites saved but reload signal failed: {}", e);
        }
        Ok(saved)
    }

    /// Last loaded copy
    pub fn patterns(&self) -> Vec<String> {
        self.current.borrow().as_slice().to_vec()
    }

    pub fn site_list(&self) -> SiteList {
        self.current.borrow().clone()
    }
}
