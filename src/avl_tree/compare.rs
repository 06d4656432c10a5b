use std::cmp::Ordering;

/// A three-way comparison over keys of type `T`.
///
/// Any `Fn(&T, &T) -> Ordering` closure is a comparator, which makes it easy to order keys by a
/// projection or in reverse.
///
/// # Examples
/// ```
/// use avl_collections::avl_tree::AvlTree;
///
/// let mut tree = AvlTree::<u32, _>::with_comparator(|a: &u32, b: &u32| b.cmp(a));
/// tree.extend(vec![1, 2, 3]);
/// assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&3, &2, &1]);
/// ```
pub trait Compare<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders keys by their `Ord` implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Natural;

impl<T> Compare<T> for Natural
where
    T: Ord + ?Sized,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T, F> Compare<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
