use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rayon::prelude::*;

use crate::nuclide::{Nuclide, NuclideBuilder};
use crate::sab::{SAlphaBeta, SAlphaBetaBuilder};

//=====================================================================
// Shared cache of published aggregates, keyed by table name.
//
// Workers fetch an `Arc` once and then read through it without
// touching the cache again, so the shard locks inside the map are
// never on the transport hot path. An aggregate is released when the
// cache and the last worker holding it have both let go.
//=====================================================================
#[derive(Debug, Default)]
pub struct Library {
    nuclides: DashMap<String, Arc<Nuclide>>,
    sab: DashMap<String, Arc<SAlphaBeta>>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self { nuclides: DashMap::with_capacity(n), sab: DashMap::new() }
    }

    // Build, publish and cache a single nuclide. A name that is already
    // cached is an error; `insert_nuclide` is the replacement path.
    pub fn publish_nuclide(&self, builder: NuclideBuilder) -> Result<Arc<Nuclide>> {
        let name = builder.name().to_string();
        if self.nuclides.contains_key(&name) {
            bail!("nuclide {} is already cached", name);
        }
        let nuclide = builder.build().with_context(|| format!("failed to build nuclide {}", name))?.publish();
        match self.nuclides.entry(name) {
            Entry::Occupied(entry) => bail!("nuclide {} was cached while it was being built", entry.key()),
            Entry::Vacant(entry) => {
                log::debug!("caching nuclide {}", entry.key());
                entry.insert(Arc::clone(&nuclide));
            }
        }
        Ok(nuclide)
    }

    // Build independent nuclides in parallel. Either every nuclide is
    // cached or none of them are. When several builders fail, the error
    // is the one for the earliest builder in `builders`.
    pub fn publish_nuclides(&self, builders: Vec<NuclideBuilder>) -> Result<Vec<Arc<Nuclide>>> {
        let mut names = HashSet::with_capacity(builders.len());
        for builder in &builders {
            if !names.insert(builder.name()) {
                bail!("nuclide {} is requested more than once", builder.name());
            }
            if self.nuclides.contains_key(builder.name()) {
                bail!("nuclide {} is already cached", builder.name());
            }
        }

        let built: Vec<Result<Nuclide>> = builders
            .into_par_iter()
            .map(|builder| {
                let name = builder.name().to_string();
                builder.build().with_context(|| format!("failed to build nuclide {}", name))
            })
            .collect();
        let nuclides = built.into_iter().collect::<Result<Vec<Nuclide>>>()?;

        Ok(nuclides
            .into_iter()
            .map(|nuclide| {
                let nuclide = nuclide.publish();
                self.insert_nuclide(Arc::clone(&nuclide));
                nuclide
            })
            .collect())
    }

    pub fn publish_sab(&self, builder: SAlphaBetaBuilder) -> Result<Arc<SAlphaBeta>> {
        let name = builder.name().to_string();
        if self.sab.contains_key(&name) {
            bail!("S(a,b) table {} is already cached", name);
        }
        let sab = builder.build().with_context(|| format!("failed to build S(a,b) table {}", name))?.publish();
        self.insert_sab(Arc::clone(&sab));
        Ok(sab)
    }

    // Returns the nuclide previously cached under the same name, if any
    pub fn insert_nuclide(&self, nuclide: Arc<Nuclide>) -> Option<Arc<Nuclide>> {
        log::debug!("caching nuclide {}", nuclide.name());
        self.nuclides.insert(nuclide.name().to_string(), nuclide)
    }

    pub fn insert_sab(&self, sab: Arc<SAlphaBeta>) -> Option<Arc<SAlphaBeta>> {
        log::debug!("caching S(a,b) table {}", sab.name());
        self.sab.insert(sab.name().to_string(), sab)
    }

    pub fn nuclide(&self, name: &str) -> Option<Arc<Nuclide>> {
        self.nuclides.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn sab(&self, name: &str) -> Option<Arc<SAlphaBeta>> {
        self.sab.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove_nuclide(&self, name: &str) -> Option<Arc<Nuclide>> {
        let removed = self.nuclides.remove(name).map(|(_, nuclide)| nuclide);
        if removed.is_some() {
            log::debug!("evicting nuclide {}", name);
        }
        removed
    }

    pub fn remove_sab(&self, name: &str) -> Option<Arc<SAlphaBeta>> {
        let removed = self.sab.remove(name).map(|(_, sab)| sab);
        if removed.is_some() {
            log::debug!("evicting S(a,b) table {}", name);
        }
        removed
    }

    pub fn n_nuclides(&self) -> usize {
        self.nuclides.len()
    }

    pub fn n_sab(&self) -> usize {
        self.sab.len()
    }

    pub fn len(&self) -> usize {
        self.n_nuclides() + self.n_sab()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn nuclide_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nuclides.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn clear(&self) {
        log::debug!("clearing library of {} tables", self.len());
        self.nuclides.clear();
        self.sab.clear();
    }
}

impl std::fmt::Display for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Library({} nuclides, {} S(a,b) tables)", self.n_nuclides(), self.n_sab())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::utils::testing::{fissile_builder, sab_builder, simple_builder};

    #[test]
    fn test_publish_and_lookup() {
        let library = Library::new();
        let nuclide = library.publish_nuclide(fissile_builder()).unwrap();
        let sab = library.publish_sab(sab_builder()).unwrap();

        assert_eq!(library.len(), 2);
        assert!(Arc::ptr_eq(&library.nuclide("92235.80c").unwrap(), &nuclide));
        assert!(Arc::ptr_eq(&library.sab("lwtr.20t").unwrap(), &sab));
        assert!(library.nuclide("lwtr.20t").is_none());
        assert_eq!(format!("{}", library), "Library(1 nuclides, 1 S(a,b) tables)");
    }

    #[test]
    fn test_publish_nuclides_in_parallel() {
        let library = Library::with_capacity(16);
        let builders = (0..16).map(|i| simple_builder(&format!("{}.80c", 1001 + i))).collect();
        let nuclides = library.publish_nuclides(builders).unwrap();
        assert_eq!(nuclides.len(), 16);
        assert_eq!(library.n_nuclides(), 16);
        assert_eq!(library.nuclide_names()[0], "1001.80c");
    }

    #[test]
    fn test_failed_batch_caches_nothing() {
        let library = Library::new();
        let builders = || {
            vec![
                simple_builder("1001.80c"),
                simple_builder("8016.80c").energy_grid(vec![2.0, 1.0, 3.0]),
                simple_builder("2004.80c"),
                simple_builder("9019.80c").energy_grid(vec![]),
            ]
        };

        // The earliest failing builder is reported, whichever thread saw its own failure first
        for _ in 0..8 {
            let error = library.publish_nuclides(builders()).unwrap_err();
            assert_eq!(error.to_string(), "failed to build nuclide 8016.80c");
            assert!(library.is_empty());
        }
    }

    #[test]
    fn test_batch_rejects_repeated_names() {
        let library = Library::new();
        let builders = vec![simple_builder("1001.80c"), simple_builder("2004.80c"), simple_builder("1001.80c")];
        let error = library.publish_nuclides(builders).unwrap_err();
        assert_eq!(error.to_string(), "nuclide 1001.80c is requested more than once");
        assert!(library.is_empty());

        library.publish_nuclide(simple_builder("1001.80c")).unwrap();
        let error = library.publish_nuclides(vec![simple_builder("2004.80c"), simple_builder("1001.80c")]).unwrap_err();
        assert_eq!(error.to_string(), "nuclide 1001.80c is already cached");
        assert_eq!(library.nuclide_names(), vec!["1001.80c"]);
    }

    #[test]
    fn test_publish_does_not_replace() {
        let library = Library::new();
        let first = library.publish_nuclide(simple_builder("1001.80c")).unwrap();
        let error = library.publish_nuclide(simple_builder("1001.80c")).unwrap_err();
        assert_eq!(error.to_string(), "nuclide 1001.80c is already cached");
        assert!(Arc::ptr_eq(&library.nuclide("1001.80c").unwrap(), &first));

        library.publish_sab(sab_builder()).unwrap();
        assert!(library.publish_sab(sab_builder()).is_err());
        assert_eq!(library.n_sab(), 1);
    }

    #[test]
    fn test_replace_and_evict() {
        let library = Library::new();
        let first = library.publish_nuclide(simple_builder("1001.80c")).unwrap();
        let replaced = library.insert_nuclide(simple_builder("1001.80c").build().unwrap().publish());
        assert!(Arc::ptr_eq(&replaced.unwrap(), &first));

        assert!(library.remove_nuclide("1001.80c").is_some());
        assert!(library.remove_nuclide("1001.80c").is_none());
        assert!(library.remove_sab("lwtr.20t").is_none());

        library.publish_sab(sab_builder()).unwrap();
        library.clear();
        assert!(library.is_empty());
    }

    #[test]
    fn test_release_after_last_holder() {
        let library = Library::new();
        let nuclide = library.publish_nuclide(simple_builder("1001.80c")).unwrap();
        let weak = Arc::downgrade(&nuclide);

        drop(library);
        assert!(weak.upgrade().is_some());
        drop(nuclide);
        assert!(weak.upgrade().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_readers() {
        let library = Arc::new(Library::new());
        let weak = Arc::downgrade(&library.publish_nuclide(fissile_builder()).unwrap());

        let mut handles = Vec::new();
        for worker in 0..32 {
            let library = Arc::clone(&library);
            handles.push(tokio::spawn(async move {
                // One cache lookup per worker, then lock-free reads
                let nuclide = library.nuclide("92235.80c").unwrap();
                let g = nuclide.grid_search(1.5 + worker as f64 * 0.25);
                let total = nuclide.xs().total[g];
                let fission = nuclide.reaction(18).unwrap().xs(g);
                (total, fission)
            }));
        }
        for handle in handles {
            let (total, fission) = handle.await.unwrap();
            assert!(total >= fission);
        }

        let nuclide = library.nuclide("92235.80c").unwrap();
        assert_abs_diff_eq!(nuclide.xs().total[0], 700.0, epsilon = 1e-12);
        drop(nuclide);

        assert!(weak.upgrade().is_some());
        drop(library);
        assert!(weak.upgrade().is_none());
    }
}
