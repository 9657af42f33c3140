use core::any::Any;

use crate::{Def, ListDef, Shape, Unravel, shape_of};

impl<T: Unravel> Unravel for Vec<T> {
    const SHAPE: &'static Shape = &const {
        Shape::builder::<Self>(
            "Vec",
            Def::List(ListDef {
                element: shape_of::<T>,
                push_zero: |target| {
                    let list = target.downcast_mut::<Self>()?;
                    list.push(T::zero());
                    list.last_mut().map(|element| element as &mut dyn Any)
                },
            }),
        )
        .build()
    };

    fn zero() -> Self {
        Vec::new()
    }
}
