/// Implements `Copy` and conversions from and to fixed-size arrays for a
/// generic struct whose fields all share the type parameter, and generates
/// tests asserting that the array conversions preserve field order.
#[macro_export]
macro_rules! impl_standard_traits {
    ($type_name:ident, $type_param:ident, $len:literal, [$($field:ident),+]) => {
        impl<$type_param> Copy for $type_name<$type_param> where $type_param: Copy {}

        impl<$type_param> From<[$type_param; $len]> for $type_name<$type_param> {
            #[inline]
            fn from(value: [$type_param; $len]) -> Self {
                let [$($field),+] = value;
                Self { $($field),+ }
            }
        }

        impl<$type_param> From<$type_name<$type_param>> for [$type_param; $len] {
            #[inline]
            fn from(value: $type_name<$type_param>) -> Self {
                [$(value.$field),+]
            }
        }

        impl<$type_param> $type_name<$type_param> {
            /// Returns the components in declaration order.
            #[inline]
            pub fn to_array(&self) -> [$type_param; $len]
            where
                $type_param: Clone,
            {
                [$(self.$field.clone()),+]
            }
        }

        #[cfg(test)]
        paste::paste! {
            #[cfg(test)]
            mod [<tests_gen_ $type_name:snake>] {
                use super::*;

                #[test]
                fn test_array_round_trip() {
                    let mut data = [0_u32; $len];
                    for (i, value) in data.iter_mut().enumerate() {
                        *value = i as u32 + 1;
                    }
                    let value = $type_name::from(data);
                    let array: [u32; $len] = value.into();
                    assert_eq!(array, data);
                }

                #[test]
                fn test_to_array_matches_len() {
                    let value = $type_name::from([7_u32; $len]);
                    assert_eq!(value.to_array().len(), $len);
                    assert_eq!(value.len(), $len);
                }
            }
        }
    };
}
