use crate::{Def, ScalarType, Shape, Unravel};

macro_rules! impl_scalar {
    ($($ty:ty => $scalar:ident),* $(,)?) => {$(
        impl Unravel for $ty {
            const SHAPE: &'static Shape = &const {
                Shape::builder::<Self>(stringify!($ty), Def::Scalar(ScalarType::$scalar)).build()
            };

            fn zero() -> Self {
                Default::default()
            }
        }
    )*};
}

impl_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => String,
}
