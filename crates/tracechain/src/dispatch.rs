//! Name-based invocation.
//!
//! Ledger platforms invoke a contract by function name with positional
//! string arguments. [`SupplyChainContract::invoke`] parses those, calls the
//! typed operation and encodes the result: JSON for queries, `true`/`false`
//! for existence checks and an empty payload for mutations.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracechain_core::{encode_payload, NewOrder, NewProduct, NewUser};
use tracechain_store::StateStub;

use crate::contract::SupplyChainContract;
use crate::error::{ContractError, Result};

/// Every function the contract exposes by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    InitLedger,
    CreateUser,
    UserExists,
    GetUser,
    CreateProduct,
    ProductExists,
    GetProduct,
    TransferProduct,
    UpdateProductStatus,
    GetProductHistory,
    CreateOrder,
    OrderExists,
    GetOrder,
    UpdateOrderStatus,
    GetAllProducts,
    GetProductsByOwner,
    GetOrdersByUser,
    ValidateQRCode,
}

impl Function {
    pub const ALL: [Function; 18] = [
        Function::InitLedger,
        Function::CreateUser,
        Function::UserExists,
        Function::GetUser,
        Function::CreateProduct,
        Function::ProductExists,
        Function::GetProduct,
        Function::TransferProduct,
        Function::UpdateProductStatus,
        Function::GetProductHistory,
        Function::CreateOrder,
        Function::OrderExists,
        Function::GetOrder,
        Function::UpdateOrderStatus,
        Function::GetAllProducts,
        Function::GetProductsByOwner,
        Function::GetOrdersByUser,
        Function::ValidateQRCode,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Function::InitLedger => "InitLedger",
            Function::CreateUser => "CreateUser",
            Function::UserExists => "UserExists",
            Function::GetUser => "GetUser",
            Function::CreateProduct => "CreateProduct",
            Function::ProductExists => "ProductExists",
            Function::GetProduct => "GetProduct",
            Function::TransferProduct => "TransferProduct",
            Function::UpdateProductStatus => "UpdateProductStatus",
            Function::GetProductHistory => "GetProductHistory",
            Function::CreateOrder => "CreateOrder",
            Function::OrderExists => "OrderExists",
            Function::GetOrder => "GetOrder",
            Function::UpdateOrderStatus => "UpdateOrderStatus",
            Function::GetAllProducts => "GetAllProducts",
            Function::GetProductsByOwner => "GetProductsByOwner",
            Function::GetOrdersByUser => "GetOrdersByUser",
            Function::ValidateQRCode => "ValidateQRCode",
        }
    }

    /// Number of positional arguments the function takes.
    pub fn arity(&self) -> usize {
        match self {
            Function::InitLedger | Function::GetAllProducts => 0,
            Function::UserExists
            | Function::GetUser
            | Function::ProductExists
            | Function::GetProduct
            | Function::GetProductHistory
            | Function::OrderExists
            | Function::GetOrder
            | Function::GetProductsByOwner
            | Function::GetOrdersByUser
            | Function::ValidateQRCode => 1,
            Function::UpdateOrderStatus => 2,
            Function::TransferProduct | Function::UpdateProductStatus => 4,
            Function::CreateUser | Function::CreateOrder => 6,
            Function::CreateProduct => 7,
        }
    }

    /// Whether the function only reads world state.
    pub fn is_query(&self) -> bool {
        !matches!(
            self,
            Function::InitLedger
                | Function::CreateUser
                | Function::CreateProduct
                | Function::TransferProduct
                | Function::UpdateProductStatus
                | Function::CreateOrder
                | Function::UpdateOrderStatus
        )
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self> {
        Function::ALL
            .into_iter()
            .find(|function| function.name() == s)
            .ok_or_else(|| ContractError::UnknownFunction(s.to_string()))
    }
}

/// Positional arguments checked against a function's arity.
struct Args<'a, A> {
    function: Function,
    values: &'a [A],
}

impl<'a, A: AsRef<str>> Args<'a, A> {
    fn new(function: Function, values: &'a [A]) -> Result<Self> {
        if values.len() != function.arity() {
            return Err(ContractError::InvalidArguments {
                function: function.name().to_string(),
                reason: format!("expected {} arguments, got {}", function.arity(), values.len()),
            });
        }
        Ok(Self { function, values })
    }

    fn str(&self, index: usize) -> &'a str {
        self.values[index].as_ref()
    }

    fn parse<T>(&self, index: usize, field: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.str(index);
        raw.parse().map_err(|e| ContractError::InvalidArguments {
            function: self.function.name().to_string(),
            reason: format!("{field} {raw:?}: {e}"),
        })
    }
}

fn payload<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(encode_payload(value)?)
}

impl SupplyChainContract {
    /// Invoke `function` by name with positional string arguments.
    pub fn invoke<C, A>(&self, ctx: &mut C, function: &str, args: &[A]) -> Result<Vec<u8>>
    where
        C: StateStub + ?Sized,
        A: AsRef<str>,
    {
        let function: Function = function.parse()?;
        self.dispatch(ctx, function, args)
    }

    /// Invoke an already-resolved function.
    pub fn dispatch<C, A>(&self, ctx: &mut C, function: Function, args: &[A]) -> Result<Vec<u8>>
    where
        C: StateStub + ?Sized,
        A: AsRef<str>,
    {
        let args = Args::new(function, args)?;

        match function {
            Function::InitLedger => {
                self.init_ledger(ctx)?;
                Ok(Vec::new())
            }
            Function::CreateUser => {
                let user = NewUser::new(
                    args.str(0),
                    args.str(1),
                    args.str(2),
                    args.str(3),
                    args.str(4),
                    args.str(5),
                );
                self.create_user(ctx, user)?;
                Ok(Vec::new())
            }
            Function::UserExists => payload(&self.user_exists(ctx, args.str(0))?),
            Function::GetUser => payload(&self.get_user(ctx, args.str(0))?),
            Function::CreateProduct => {
                let product = NewProduct::new(
                    args.str(0),
                    args.str(1),
                    args.str(2),
                    args.str(3),
                    args.parse::<f64>(4, "price")?,
                    args.str(5),
                );
                self.create_product(ctx, product, args.str(6))?;
                Ok(Vec::new())
            }
            Function::ProductExists => payload(&self.product_exists(ctx, args.str(0))?),
            Function::GetProduct => payload(&self.get_product(ctx, args.str(0))?),
            Function::TransferProduct => {
                self.transfer_product(ctx, args.str(0), args.str(1), args.str(2), args.str(3))?;
                Ok(Vec::new())
            }
            Function::UpdateProductStatus => {
                let (id, status) = (args.str(0), args.str(1));
                self.update_product_status(ctx, id, status, args.str(2), args.str(3))?;
                Ok(Vec::new())
            }
            Function::GetProductHistory => payload(&self.get_product_history(ctx, args.str(0))?),
            Function::CreateOrder => {
                let order = NewOrder::new(
                    args.str(0),
                    args.str(1),
                    args.str(2),
                    args.str(3),
                    args.parse::<i64>(4, "quantity")?,
                    args.parse::<f64>(5, "totalPrice")?,
                );
                self.create_order(ctx, order)?;
                Ok(Vec::new())
            }
            Function::OrderExists => payload(&self.order_exists(ctx, args.str(0))?),
            Function::GetOrder => payload(&self.get_order(ctx, args.str(0))?),
            Function::UpdateOrderStatus => {
                self.update_order_status(ctx, args.str(0), args.str(1))?;
                Ok(Vec::new())
            }
            Function::GetAllProducts => payload(&self.get_all_products(ctx)?),
            Function::GetProductsByOwner => payload(&self.get_products_by_owner(ctx, args.str(0))?),
            Function::GetOrdersByUser => payload(&self.get_orders_by_user(ctx, args.str(0))?),
            Function::ValidateQRCode => payload(&self.validate_qr_code(ctx, args.str(0))?),
        }
    }
}
