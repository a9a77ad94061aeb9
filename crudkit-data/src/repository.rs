use std::future::Future;

use crate::entity::Entity;
use crate::error::DataError;
use crate::filter::{Filter, ListQuery};
use crate::page::{Page, Pageable};
use crate::value::Fields;

/// Generic async CRUD operations for one entity type.
///
/// Uses RPITIT (return-position `impl Trait` in traits), so no
/// `async-trait` is needed. Methods take `&mut self` because a repository
/// drives a single borrowed connection, one statement at a time.
pub trait Repository<T: Entity> {
    /// Insert one row and return it as stored.
    fn create(&mut self, fields: &Fields) -> impl Future<Output = Result<T, DataError>>;

    /// Insert every row in order. The whole batch is validated before the
    /// first insert runs.
    fn create_many(&mut self, batch: &[Fields]) -> impl Future<Output = Result<Vec<T>, DataError>>;

    /// Fetch by primary key, failing with [`DataError::NotFound`].
    fn get(&mut self, id: &T::Id) -> impl Future<Output = Result<T, DataError>>;

    fn find(&mut self, id: &T::Id) -> impl Future<Output = Result<Option<T>, DataError>>;

    fn list(&mut self, query: &ListQuery) -> impl Future<Output = Result<Vec<T>, DataError>>;

    fn count(&mut self, filters: &[Filter]) -> impl Future<Output = Result<u64, DataError>>;

    /// One page of the filtered rows together with the total count.
    fn page(
        &mut self,
        pageable: &Pageable,
        filters: &[Filter],
    ) -> impl Future<Output = Result<Page<T>, DataError>>;

    /// Apply `fields` to an existing row and return it as stored.
    fn update(&mut self, id: &T::Id, fields: &Fields) -> impl Future<Output = Result<T, DataError>>;

    /// Remove a row and return it as it was before deletion.
    fn delete(&mut self, id: &T::Id) -> impl Future<Output = Result<T, DataError>>;
}
