//! std types decoded from their text form.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use crate::{Def, Shape, Unravel, parse_from_str};

macro_rules! impl_from_str {
    ($($ty:ident => $zero:expr),* $(,)?) => {$(
        impl Unravel for $ty {
            const SHAPE: &'static Shape = &const {
                Shape::builder::<Self>(stringify!($ty), Def::Opaque)
                    .parse(parse_from_str::<Self>)
                    .build()
            };

            fn zero() -> Self {
                $zero
            }
        }
    )*};
}

impl_from_str! {
    char => '\0',
    IpAddr => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    Ipv4Addr => Ipv4Addr::UNSPECIFIED,
    Ipv6Addr => Ipv6Addr::UNSPECIFIED,
    SocketAddr => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
    PathBuf => PathBuf::new(),
}
