/// A sequence that can be measured, cut in two, and glued back together.
///
/// The list sorts are written against this: merge sort splits at the
/// structural midpoint and the quicksorts concatenate their partitions.
pub trait Collection where Self: Sized {
    fn len(&self) -> usize;
    fn split(self, index: usize) -> (Self, Self);
    fn append(&mut self, other: Self);
}
