use crate::TermStore;
use std::collections::HashMap;
use std::sync::Mutex;
use termbot_model::Lang;

/// Bidirectional name ↔ numeric ID mapping used to keep interaction
/// payloads short. Categories and subcategories number independently,
/// starting at 1; registration is idempotent and append-only for the
/// life of the process.
///
/// One instance is built at the composition root and shared by handle;
/// register-if-absent is atomic under the inner lock, so concurrent
/// sessions cannot allocate two IDs for one name.
pub struct IdMapper {
    inner: Mutex<MapperInner>,
}

#[derive(Default)]
struct MapperInner {
    cat_to_id: HashMap<String, u32>,
    id_to_cat: HashMap<u32, String>,
    sub_to_id: HashMap<String, u32>,
    id_to_sub: HashMap<u32, String>,
    next_cat_id: u32,
    next_sub_id: u32,
}

impl IdMapper {
    #[must_use]
    pub fn new() -> IdMapper {
        IdMapper {
            inner: Mutex::new(MapperInner {
                next_cat_id: 1,
                next_sub_id: 1,
                ..MapperInner::default()
            }),
        }
    }

    /// Register every category and subcategory in listing order so IDs
    /// come out the same on every restart.
    pub fn prime_from_store(&self, store: &TermStore) {
        for lang in Lang::ALL {
            for category in store.categories(lang) {
                self.register_category(category);
                for subcategory in store.subcategories(category, lang) {
                    self.register_subcategory(subcategory);
                }
            }
        }
    }

    /// Returns the existing ID when the name is already registered.
    pub fn register_category(&self, name: &str) -> u32 {
        let mut inner = self.inner.lock().expect("mapper lock");
        if let Some(&id) = inner.cat_to_id.get(name) {
            return id;
        }
        let id = inner.next_cat_id;
        inner.next_cat_id += 1;
        inner.cat_to_id.insert(name.to_string(), id);
        inner.id_to_cat.insert(id, name.to_string());
        id
    }

    pub fn register_subcategory(&self, name: &str) -> u32 {
        let mut inner = self.inner.lock().expect("mapper lock");
        if let Some(&id) = inner.sub_to_id.get(name) {
            return id;
        }
        let id = inner.next_sub_id;
        inner.next_sub_id += 1;
        inner.sub_to_id.insert(name.to_string(), id);
        inner.id_to_sub.insert(id, name.to_string());
        id
    }

    /// Reverse lookup; `None` is a normal outcome the caller surfaces
    /// as a user-facing "not found".
    #[must_use]
    pub fn category_name(&self, id: u32) -> Option<String> {
        self.inner
            .lock()
            .expect("mapper lock")
            .id_to_cat
            .get(&id)
            .cloned()
    }

    #[must_use]
    pub fn subcategory_name(&self, id: u32) -> Option<String> {
        self.inner
            .lock()
            .expect("mapper lock")
            .id_to_sub
            .get(&id)
            .cloned()
    }

    #[must_use]
    pub fn category_id(&self, name: &str) -> Option<u32> {
        self.inner
            .lock()
            .expect("mapper lock")
            .cat_to_id
            .get(name)
            .copied()
    }

    #[must_use]
    pub fn subcategory_id(&self, name: &str) -> Option<u32> {
        self.inner
            .lock()
            .expect("mapper lock")
            .sub_to_id
            .get(name)
            .copied()
    }
}

impl Default for IdMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::IdMapper;
    use std::sync::Arc;

    #[test]
    fn registration_is_idempotent() {
        let mapper = IdMapper::new();
        let first = mapper.register_category("Денсаулық");
        let second = mapper.register_category("Денсаулық");
        assert_eq!(first, second);
        assert_eq!(first, 1);
    }

    #[test]
    fn distinct_names_get_distinct_ids() {
        let mapper = IdMapper::new();
        let a = mapper.register_category("Денсаулық");
        let b = mapper.register_category("Экономика");
        assert_ne!(a, b);
        assert_eq!(mapper.category_name(a).as_deref(), Some("Денсаулық"));
        assert_eq!(mapper.category_name(b).as_deref(), Some("Экономика"));
    }

    #[test]
    fn category_and_subcategory_spaces_are_independent() {
        let mapper = IdMapper::new();
        let cat = mapper.register_category("Денсаулық");
        let sub = mapper.register_subcategory("Емхана");
        // Both start at 1 in their own numbering space.
        assert_eq!(cat, 1);
        assert_eq!(sub, 1);
        assert_eq!(mapper.subcategory_name(sub).as_deref(), Some("Емхана"));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mapper = IdMapper::new();
        assert_eq!(mapper.category_name(99), None);
        assert_eq!(mapper.subcategory_name(99), None);
        assert_eq!(mapper.category_id("нет"), None);
    }

    #[test]
    fn concurrent_registration_allocates_one_id() {
        let mapper = Arc::new(IdMapper::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let mapper = mapper.clone();
            handles.push(std::thread::spawn(move || {
                mapper.register_category("Құқық")
            }));
        }
        let ids: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.iter().all(|&id| id == ids[0]));
    }
}
