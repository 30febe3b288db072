use std::{
    any::{Any, TypeId},
    borrow::Cow,
    cell::RefCell,
    rc::Rc,
};

use colview_common::{Result, error::Error};
use colview_vector::DecodedVector;

use crate::{arg_type::ArgType, view::generic::GenericView};

use super::VectorReader;

/// Maximum number of typed readers kept by one [`CastCache`].
pub const CAST_CACHE_SLOTS: usize = 3;

const NULL_PROPAGATION_UNSUPPORTED: &str =
    "null propagation is unsupported for generic arguments";

/// Typed readers created by casting the views of one [`GenericReader`].
///
/// Slots are kept most recently used first. A cast to the same target type as
/// the previous cast skips the data type check.
#[derive(Default)]
pub struct CastCache {
    last_cast: Option<TypeId>,
    slots: Vec<(TypeId, Rc<dyn Any>)>,
}

impl CastCache {
    /// Number of cached readers.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns `true` if the most recent successful cast was to `T`.
    pub fn is_last_cast<T: ArgType>(&self) -> bool {
        self.last_cast == Some(TypeId::of::<T>())
    }

    /// Returns the reader of `decoded` as `T`, creating and caching it if
    /// needed, or `None` if `T` does not accept the column's data type.
    pub(crate) fn resolve<T: ArgType>(
        &mut self,
        decoded: &DecodedVector,
    ) -> Result<Option<Rc<T::Reader<'static>>>> {
        let type_id = TypeId::of::<T>();
        if self.last_cast != Some(type_id) && !T::accepts(decoded.data_type()) {
            log::trace!(
                "generic cast to {} rejected for {}",
                T::signature(),
                decoded.data_type()
            );
            return Ok(None);
        }

        match self.slots.iter().position(|(id, _)| *id == type_id) {
            Some(0) => (),
            Some(position) => {
                log::trace!("generic cast cache hit for {}", T::signature());
                let slot = self.slots.remove(position);
                self.slots.insert(0, slot);
            }
            None => {
                log::trace!("generic cast cache miss for {}", T::signature());
                let reader = T::create_reader(Cow::Owned(decoded.clone()))?;
                self.slots.insert(0, (type_id, Rc::new(reader) as Rc<dyn Any>));
                self.slots.truncate(CAST_CACHE_SLOTS);
            }
        }
        self.last_cast = Some(type_id);

        let reader = self.slots[0].1.clone();
        reader
            .downcast::<T::Reader<'static>>()
            .map(Some)
            .map_err(|_| Error::invalid_operation("generic cast cache slot type"))
    }
}

/// Reader of an argument whose type is resolved per row.
///
/// Views share the reader's [`CastCache`], so consecutive casts to the same
/// type reuse one typed reader.
pub struct GenericReader<'a> {
    decoded: Cow<'a, DecodedVector>,
    cache: RefCell<CastCache>,
}

impl<'a> GenericReader<'a> {
    pub fn new(decoded: Cow<'a, DecodedVector>) -> GenericReader<'a> {
        GenericReader {
            decoded,
            cache: RefCell::new(CastCache::default()),
        }
    }

    pub fn decoded(&self) -> &DecodedVector {
        &self.decoded
    }

    /// Number of typed readers currently cached.
    pub fn cached_casts(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_last_cast<T: ArgType>(&self) -> bool {
        self.cache.borrow().is_last_cast::<T>()
    }
}

impl VectorReader for GenericReader<'_> {
    type Item<'r>
        = GenericView<'r>
    where
        Self: 'r;

    type NullFreeItem<'r>
        = GenericView<'r>
    where
        Self: 'r;

    #[inline]
    fn len(&self) -> usize {
        self.decoded.size()
    }

    #[inline]
    fn is_set(&self, offset: usize) -> bool {
        !self.decoded.is_null_at(offset)
    }

    #[inline]
    fn get(&self, offset: usize) -> Self::Item<'_> {
        GenericView::new(&self.decoded, &self.cache, offset)
    }

    #[inline]
    fn read_null_free(&self, offset: usize) -> Self::NullFreeItem<'_> {
        self.get(offset)
    }

    #[inline]
    fn may_have_nulls(&self) -> bool {
        self.decoded.may_have_nulls()
    }

    fn set_children_may_have_nulls(&mut self) -> Result<()> {
        Err(Error::unsupported(NULL_PROPAGATION_UNSUPPORTED))
    }

    fn contains_null(&self, _index: usize) -> bool {
        panic!("{NULL_PROPAGATION_UNSUPPORTED}")
    }

    fn contains_null_range(&self, _start: usize, _end: usize) -> bool {
        panic!("{NULL_PROPAGATION_UNSUPPORTED}")
    }

    fn may_have_nulls_recursive(&self) -> bool {
        panic!("{NULL_PROPAGATION_UNSUPPORTED}")
    }
}
