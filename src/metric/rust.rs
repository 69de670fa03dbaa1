use crate::util::Pixel;

#[must_use]
pub(super) fn sad_row<T: Pixel>(a: &[T], b: &[T]) -> u64 {
    a.iter().zip(b.iter()).fold(0, |acc, (&s, &r)| {
        let val1: u32 = s.into();
        let val2: u32 = r.into();
        acc + val1.abs_diff(val2) as u64
    })
}

#[must_use]
pub(super) fn ssd_row<T: Pixel>(a: &[T], b: &[T]) -> u64 {
    a.iter().zip(b.iter()).fold(0, |acc, (&s, &r)| {
        let val1: u32 = s.into();
        let val2: u32 = r.into();
        let diff = val1.abs_diff(val2) as u64;
        acc + diff * diff
    })
}
