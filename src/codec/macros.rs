//! Declarative codec derivation for user types

/// Implement `Encode` and `Decode` for a struct from its field list
///
/// Fields are written in the order listed, with no prefix and no tags. List
/// them in declaration order so the wire form follows the type definition.
///
/// ```
/// use contractkv::impl_codec;
///
/// #[derive(Debug, PartialEq)]
/// struct Account {
///     owner: String,
///     balance: u64,
/// }
///
/// impl_codec!(Account { owner, balance });
///
/// let account = Account { owner: "alice".into(), balance: 10 };
/// let bytes = contractkv::encode(&account);
/// assert_eq!(contractkv::decode::<Account>(&bytes).unwrap(), account);
/// ```
#[macro_export]
macro_rules! impl_codec {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::codec::Encode for $ty {
            fn encode_into<S: $crate::codec::Sink>(&self, sink: &mut S) {
                $( $crate::codec::Encode::encode_into(&self.$field, sink); )*
                let _ = sink;
            }
        }

        impl $crate::codec::Decode for $ty {
            #[allow(unused_variables)]
            fn decode_from<S: $crate::codec::Source>(src: &mut S) -> $crate::Result<Self> {
                Ok(Self {
                    $( $field: $crate::codec::Decode::decode_from(src)?, )*
                })
            }
        }
    };

    ($ty:ident < $($param:ident),+ > { $($field:ident),* $(,)? }) => {
        impl<$($param: $crate::codec::Encode),+> $crate::codec::Encode for $ty<$($param),+> {
            fn encode_into<S: $crate::codec::Sink>(&self, sink: &mut S) {
                $( $crate::codec::Encode::encode_into(&self.$field, sink); )*
                let _ = sink;
            }
        }

        impl<$($param: $crate::codec::Decode),+> $crate::codec::Decode for $ty<$($param),+> {
            #[allow(unused_variables)]
            fn decode_from<S: $crate::codec::Source>(src: &mut S) -> $crate::Result<Self> {
                Ok(Self {
                    $( $field: $crate::codec::Decode::decode_from(src)?, )*
                })
            }
        }
    };
}

/// Implement `Encode` and `Decode` for a fieldless enum
///
/// The enum is written as its discriminant in the given integer type.
/// Decoding a value that names no variant fails with
/// `Error::InvalidDiscriminant`.
///
/// ```
/// use contractkv::impl_codec_enum;
///
/// #[derive(Debug, PartialEq)]
/// #[repr(u8)]
/// enum Status { Pending = 1, Done = 2 }
///
/// impl_codec_enum!(Status as u8 { Pending, Done });
///
/// assert_eq!(contractkv::encode(&Status::Done), vec![2]);
/// assert!(contractkv::decode::<Status>(&[7]).is_err());
/// ```
#[macro_export]
macro_rules! impl_codec_enum {
    ($ty:ident as $repr:ty { $($variant:ident),+ $(,)? }) => {
        impl $crate::codec::Encode for $ty {
            fn encode_into<S: $crate::codec::Sink>(&self, sink: &mut S) {
                let value: $repr = match self {
                    $( $ty::$variant => $ty::$variant as $repr, )+
                };
                $crate::codec::Encode::encode_into(&value, sink);
            }
        }

        impl $crate::codec::Decode for $ty {
            fn decode_from<S: $crate::codec::Source>(src: &mut S) -> $crate::Result<Self> {
                let value = <$repr as $crate::codec::Decode>::decode_from(src)?;
                $(
                    if value == $ty::$variant as $repr {
                        return Ok($ty::$variant);
                    }
                )+
                Err($crate::Error::InvalidDiscriminant {
                    type_name: stringify!($ty),
                    value: value as u64,
                })
            }
        }
    };
}
