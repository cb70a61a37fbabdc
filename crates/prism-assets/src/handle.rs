use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Numeric key of a loaded asset, allocated by its [`AssetServer`](crate::AssetServer).
pub type AssetId = u64;

/// Typed key into an [`AssetServer`](crate::AssetServer) store.
///
/// Copyable regardless of `T`; the type only selects which store to look in.
pub struct AssetHandle<T> {
    id: AssetId,
    kind: PhantomData<fn() -> T>,
}

impl<T> AssetHandle<T> {
    pub(crate) fn new(id: AssetId) -> Self {
        Self {
            id,
            kind: PhantomData,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for AssetHandle<T> {}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T> Eq for AssetHandle<T> {}

impl<T> Hash for AssetHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.id);
    }
}

impl<T> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = std::any::type_name::<T>().rsplit("::").next().unwrap_or("?");
        write!(f, "AssetHandle<{}>({})", short, self.id)
    }
}
