use std::borrow::Cow;

/// A trait for vector-like containers accepted by batch evaluation.
///
/// [`Function::eval_batch`](crate::Function::eval_batch) reads its inputs through
/// `as_slice` and allocates its output with `zeros`, so the output has the same
/// container type as the input. Containers whose elements are not contiguous in
/// logical order hand out a copy from `as_slice`.
///
/// # Examples
///
/// ```rust
/// use polyeq::prelude::Vector;
///
/// let vec: Vec<f64> = Vector::zeros(5);
/// assert_eq!(vec.len(), 5);
///
/// let vec = vec![1.0, 2.0, 3.0];
/// assert_eq!(Vector::as_slice(&vec)[0], 1.0);
/// ```
pub trait Vector {
    /// Returns the vector's data as a slice, in logical order.
    fn as_slice(&self) -> Cow<'_, [f64]>;

    /// Returns a mutable reference to the vector's data as a slice.
    fn as_mut_slice(&mut self) -> &mut [f64];

    /// Creates a new vector of the specified length filled with zeros.
    fn zeros(len: usize) -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Vector for Vec<f64> {
    fn as_slice(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self)
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        self
    }

    fn zeros(len: usize) -> Self {
        vec![0.0; len]
    }

    fn len(&self) -> usize {
        self.len()
    }
}

/// Arrays with reversed or strided axes are copied by `as_slice`, and rewritten
/// into standard layout by `as_mut_slice`.
#[cfg(feature = "ndarray")]
impl Vector for ndarray::Array1<f64> {
    fn as_slice(&self) -> Cow<'_, [f64]> {
        match self.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(self.to_vec()),
        }
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        if !self.is_standard_layout() {
            *self = self.as_standard_layout().into_owned();
        }
        self.as_slice_mut().expect("standard layout arrays are contiguous")
    }

    fn zeros(len: usize) -> Self {
        ndarray::Array1::zeros(len)
    }

    fn len(&self) -> usize {
        self.len()
    }
}

#[cfg(feature = "nalgebra")]
impl Vector for nalgebra::DVector<f64> {
    fn as_slice(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self.as_slice())
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        self.as_mut_slice()
    }

    fn zeros(len: usize) -> Self {
        nalgebra::DVector::zeros(len)
    }

    fn len(&self) -> usize {
        self.len()
    }
}

/// Fixed-size arrays; `zeros` panics unless `len == N`.
impl<const N: usize> Vector for [f64; N] {
    fn as_slice(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self)
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        self
    }

    fn zeros(len: usize) -> Self {
        assert_eq!(len, N, "Array length must match const generic size");
        [0.0; N]
    }

    fn len(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Function, Polynomial};

    fn cubic() -> Function {
        Function::from(Polynomial::from_ascending(vec![1.0, 0.0, 0.0, 1.0]))
    }

    #[test]
    fn test_vec_batch() {
        let xs: Vec<f64> = (0..1000).map(|i| i as f64 / 100.0).collect();
        let ys = cubic().eval_batch(&xs);
        assert_eq!(ys.len(), xs.len());
        for (x, y) in xs.iter().zip(&ys) {
            assert_eq!(*y, cubic().eval(*x));
        }
    }

    #[test]
    fn test_empty_batch() {
        let ys = cubic().eval_batch(&Vec::<f64>::new());
        assert!(Vector::is_empty(&ys));
    }

    #[test]
    #[should_panic(expected = "Array length must match const generic size")]
    fn test_array_zeros_wrong_length() {
        let _ = <[f64; 3]>::zeros(2);
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn test_ndarray_batch() {
        let xs = ndarray::Array1::from(vec![0.0, 1.0, 2.0]);
        let ys = cubic().eval_batch(&xs);
        assert_eq!(ys, ndarray::Array1::from(vec![1.0, 2.0, 9.0]));
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn test_ndarray_reversed_batch() {
        let mut xs = ndarray::Array1::from(vec![0.0, 1.0, 2.0]);
        xs.invert_axis(ndarray::Axis(0));
        assert!(matches!(Vector::as_slice(&xs), Cow::Owned(_)));
        let ys = cubic().eval_batch(&xs);
        assert_eq!(ys, ndarray::Array1::from(vec![9.0, 2.0, 1.0]));

        let mut out = ndarray::Array1::from(vec![2.0, 1.0, 0.0]);
        out.invert_axis(ndarray::Axis(0));
        Vector::as_mut_slice(&mut out)[0] = -1.0;
        assert_eq!(out, ndarray::Array1::from(vec![-1.0, 1.0, 2.0]));
    }

    #[cfg(feature = "nalgebra")]
    #[test]
    fn test_nalgebra_batch() {
        let xs = nalgebra::DVector::from_vec(vec![0.0, 1.0, 2.0]);
        let ys = cubic().eval_batch(&xs);
        assert_eq!(ys, nalgebra::DVector::from_vec(vec![1.0, 2.0, 9.0]));
    }
}
