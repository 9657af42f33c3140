use core::any::Any;
use std::rc::Rc;
use std::sync::Arc;

use crate::{Def, PointerDef, Shape, Unravel, shape_of};

/// Wraps a decoded pointee and installs it into a pointer slot of type `P`.
fn set_pointer<P: 'static, T: 'static>(
    target: &mut dyn Any,
    pointee: Box<dyn Any>,
    wrap: fn(T) -> P,
) -> bool {
    match (target.downcast_mut::<P>(), pointee.downcast::<T>()) {
        (Some(slot), Ok(pointee)) => {
            *slot = wrap(*pointee);
            true
        }
        _ => false,
    }
}

impl<T: Unravel> Unravel for Box<T> {
    const SHAPE: &'static Shape = &const {
        Shape::builder::<Self>(
            "Box",
            Def::Pointer(PointerDef {
                pointee: shape_of::<T>,
                set: |target, pointee| set_pointer::<Self, T>(target, pointee, Box::new),
            }),
        )
        .build()
    };

    fn zero() -> Self {
        Box::new(T::zero())
    }
}

/// `None` until the source provides a value.
impl<T: Unravel> Unravel for Option<T> {
    const SHAPE: &'static Shape = &const {
        Shape::builder::<Self>(
            "Option",
            Def::Pointer(PointerDef {
                pointee: shape_of::<T>,
                set: |target, pointee| set_pointer::<Self, T>(target, pointee, Some),
            }),
        )
        .build()
    };

    fn zero() -> Self {
        None
    }
}

impl<T: Unravel> Unravel for Rc<T> {
    const SHAPE: &'static Shape = &const {
        Shape::builder::<Self>(
            "Rc",
            Def::Pointer(PointerDef {
                pointee: shape_of::<T>,
                set: |target, pointee| set_pointer::<Self, T>(target, pointee, Rc::new),
            }),
        )
        .build()
    };

    fn zero() -> Self {
        Rc::new(T::zero())
    }
}

impl<T: Unravel> Unravel for Arc<T> {
    const SHAPE: &'static Shape = &const {
        Shape::builder::<Self>(
            "Arc",
            Def::Pointer(PointerDef {
                pointee: shape_of::<T>,
                set: |target, pointee| set_pointer::<Self, T>(target, pointee, Arc::new),
            }),
        )
        .build()
    };

    fn zero() -> Self {
        Arc::new(T::zero())
    }
}
