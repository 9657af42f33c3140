use core::any::Any;

use crate::{ArrayDef, Def, Shape, Unravel, shape_of};

impl<T: Unravel, const N: usize> Unravel for [T; N] {
    const SHAPE: &'static Shape = &const {
        Shape::builder::<Self>(
            "Array",
            Def::Array(ArrayDef {
                element: shape_of::<T>,
                len: N,
                get_mut: |target, index| {
                    let array = target.downcast_mut::<Self>()?;
                    array
                        .get_mut(index)
                        .map(|element| element as &mut dyn Any)
                },
            }),
        )
        .build()
    };

    fn zero() -> Self {
        core::array::from_fn(|_| T::zero())
    }
}
