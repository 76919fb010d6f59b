/// Implements a standard arithmetic operator trait for a single-field tuple newtype by delegating to the inner type.
///
/// Three forms are supported:
/// * `op!(binary MyType, Add, add)` for binary operators,
/// * `op!(inplace MyType, AddAssign, add_assign)` for assignment operators,
/// * `op!(unary MyType, Neg, neg)` for unary operators.
///
/// The trait being implemented must be in scope at the call site.
#[macro_export]
macro_rules! op {
    (binary $type:ident, $trait:ident, $method:ident) => {
        impl $trait for $type {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self(self.0.$method(rhs.0))
            }
        }
    };
    (inplace $type:ident, $trait:ident, $method:ident) => {
        impl $trait for $type {
            fn $method(&mut self, rhs: Self) {
                self.0.$method(rhs.0);
            }
        }
    };
    (unary $type:ident, $trait:ident, $method:ident) => {
        impl $trait for $type {
            type Output = Self;

            fn $method(self) -> Self::Output {
                Self(self.0.$method())
            }
        }
    };
}
