/*!
The [`Describe`] trait and its implementations for standard library and
ecosystem types.
*/

use crate::descriptor::{FloatWidth, IntWidth, TypeDescriptor, WellKnown};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::rc::Rc;
use std::sync::{mpsc, Arc};

/// Types that can describe their own shape to the schema compiler
pub trait Describe {
    /// Describe this type
    fn describe() -> TypeDescriptor;
}

/// Types that declare a fixed list of permitted literal values
///
/// Derived automatically for enums made only of unit variants.
pub trait EnumValues {
    /// The permitted values, in declaration order
    fn enum_values() -> Vec<Value>;
}

/// Marker for a multipart file upload field
///
/// Documents as `string` / `binary`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: u64,
}

impl Describe for UploadedFile {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::structure("UploadedFile", module_path!(), Vec::new())
            .with_well_known(WellKnown::FileUpload)
    }
}

macro_rules! describe_primitive {
    ($($ty:ty => $name:literal, $ctor:expr;)*) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    $ctor.with_name($name)
                }
            }
        )*
    };
}

describe_primitive! {
    bool => "bool", TypeDescriptor::bool();
    i8 => "i8", TypeDescriptor::int(IntWidth::W8);
    i16 => "i16", TypeDescriptor::int(IntWidth::W16);
    i32 => "i32", TypeDescriptor::int(IntWidth::W32);
    i64 => "i64", TypeDescriptor::int(IntWidth::W64);
    isize => "isize", TypeDescriptor::int(IntWidth::Size);
    u8 => "u8", TypeDescriptor::uint(IntWidth::W8);
    u16 => "u16", TypeDescriptor::uint(IntWidth::W16);
    u32 => "u32", TypeDescriptor::uint(IntWidth::W32);
    u64 => "u64", TypeDescriptor::uint(IntWidth::W64);
    usize => "usize", TypeDescriptor::uint(IntWidth::Size);
    f32 => "f32", TypeDescriptor::float(FloatWidth::W32);
    f64 => "f64", TypeDescriptor::float(FloatWidth::W64);
    char => "char", TypeDescriptor::string();
    str => "str", TypeDescriptor::string();
    String => "String", TypeDescriptor::string();
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::pointer(T::describe())
    }
}

// Smart pointers and borrows are transparent
impl<T: Describe + ?Sized> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: Describe + ?Sized> Describe for Rc<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: Describe + ?Sized> Describe for Arc<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<'a, T: Describe + ?Sized> Describe for &'a T {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<'a, T: Describe + ToOwned + ?Sized> Describe for Cow<'a, T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: Describe> Describe for [T] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: Describe> Describe for LinkedList<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::array(T::describe(), N)
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map(K::describe(), V::describe())
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map(K::describe(), V::describe())
    }
}

impl<T> Describe for mpsc::Sender<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::chan()
    }
}

impl<T> Describe for mpsc::SyncSender<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::chan()
    }
}

impl<T> Describe for mpsc::Receiver<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::chan()
    }
}

macro_rules! describe_fn {
    ($($arg:ident),*) => {
        impl<R, $($arg),*> Describe for fn($($arg),*) -> R {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::func()
            }
        }
    };
}

describe_fn!();
describe_fn!(A);
describe_fn!(A, B);
describe_fn!(A, B, C);

impl Describe for Value {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::interface().named("Value", "serde_json")
    }
}

impl Describe for serde_json::value::RawValue {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(u8::describe())
            .named("RawValue", "serde_json::value")
            .with_well_known(WellKnown::RawJson)
    }
}

impl Describe for uuid::Uuid {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::array(u8::describe(), 16).named("Uuid", "uuid")
    }
}

impl<Tz: chrono::TimeZone> Describe for chrono::DateTime<Tz> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::structure("DateTime", "chrono", Vec::new())
            .with_well_known(WellKnown::Timestamp)
    }
}

impl Describe for chrono::NaiveDateTime {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::structure("NaiveDateTime", "chrono", Vec::new())
            .with_well_known(WellKnown::Timestamp)
    }
}

impl Describe for std::time::SystemTime {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::structure("SystemTime", "std::time", Vec::new())
            .with_well_known(WellKnown::Timestamp)
    }
}
