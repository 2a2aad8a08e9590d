use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use validator::{ValidationError, ValidationErrors};

use models::{Amount, NewVoucher, PricedItem, Voucher, VoucherDiscount, VoucherId, VoucherTarget};

use super::error::*;
use super::types::{acquire, RepoResult};

/// Store of redeemable vouchers. Decrementing the remaining quantity is the
/// only mutation and happens under the store lock conditioned on the counter
/// being positive, so racing redemptions of a last unit cannot both succeed.
pub trait VouchersRepo: Send + Sync + 'static {
    fn create(&self, payload: NewVoucher) -> RepoResult<Voucher>;
    fn get(&self, voucher_id: VoucherId) -> RepoResult<Option<Voucher>>;
    /// Monetary decrease the voucher contributes, as a non-negative amount
    /// over the targeted base (discounted product subtotal or shipping cost).
    fn calculate_decrease(&self, voucher_id: VoucherId, items: &[PricedItem], shipping: Amount) -> RepoResult<Amount>;
    fn decrease_quantity(&self, voucher_id: VoucherId) -> RepoResult<Voucher>;
    /// Rollback path of `decrease_quantity`.
    fn increase_quantity(&self, voucher_id: VoucherId) -> RepoResult<Voucher>;
}

#[derive(Debug, Default)]
struct State {
    vouchers: BTreeMap<i64, Voucher>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct VouchersRepoImpl {
    state: Arc<Mutex<State>>,
}

impl VouchersRepoImpl {
    pub fn new() -> Self {
        VouchersRepoImpl::default()
    }
}

impl VouchersRepo for VouchersRepoImpl {
    fn create(&self, payload: NewVoucher) -> RepoResult<Voucher> {
        debug!("Creating a voucher using payload: {:?}", payload);
        let mut state = acquire(&self.state)?;
        state.next_id += 1;
        let voucher = Voucher {
            id: VoucherId::new(state.next_id),
            target: payload.target,
            discount: payload.discount,
            remaining_quantity: payload.remaining_quantity,
        };
        state.vouchers.insert(voucher.id.inner(), voucher.clone());
        Ok(voucher)
    }

    fn get(&self, voucher_id: VoucherId) -> RepoResult<Option<Voucher>> {
        let state = acquire(&self.state)?;
        Ok(state.vouchers.get(&voucher_id.inner()).cloned())
    }

    fn calculate_decrease(&self, voucher_id: VoucherId, items: &[PricedItem], shipping: Amount) -> RepoResult<Amount> {
        let voucher = self.get(voucher_id)?.ok_or(ErrorKind::NotFound)?;
        let base = match voucher.target {
            VoucherTarget::Shipping => shipping,
            VoucherTarget::Product => {
                let mut subtotal = Amount::zero();
                for item in items {
                    let line = item.subtotal().ok_or_else(overflow_constraint)?;
                    subtotal = subtotal.checked_add(line).ok_or_else(overflow_constraint)?;
                }
                subtotal
            }
        };
        let decrease = match voucher.discount {
            VoucherDiscount::Fixed(amount) => amount.min(base),
            VoucherDiscount::Percent(percent) => base
                .checked_mul(percent as i64)
                .and_then(|scaled| scaled.checked_div_round_half_up(100))
                .ok_or_else(overflow_constraint)?,
        };
        Ok(decrease)
    }

    fn decrease_quantity(&self, voucher_id: VoucherId) -> RepoResult<Voucher> {
        debug!("Redeeming one unit of voucher {}", voucher_id);
        let mut state = acquire(&self.state)?;
        let voucher = state.vouchers.get_mut(&voucher_id.inner()).ok_or(ErrorKind::NotFound)?;
        if voucher.remaining_quantity <= 0 {
            let mut errors = ValidationErrors::new();
            let mut error = ValidationError::new("exhausted");
            error.message = Some(format!("Voucher {} has no remaining quantity", voucher_id).into());
            errors.add("voucher", error);
            return Err(ErrorKind::Constraints(errors).into());
        }
        voucher.remaining_quantity -= 1;
        Ok(voucher.clone())
    }

    fn increase_quantity(&self, voucher_id: VoucherId) -> RepoResult<Voucher> {
        debug!("Restoring one unit of voucher {}", voucher_id);
        let mut state = acquire(&self.state)?;
        let voucher = state.vouchers.get_mut(&voucher_id.inner()).ok_or(ErrorKind::NotFound)?;
        voucher.remaining_quantity += 1;
        Ok(voucher.clone())
    }
}

fn overflow_constraint() -> Error {
    let mut errors = ValidationErrors::new();
    let mut error = ValidationError::new("overflow");
    error.message = Some("voucher base amount overflowed".into());
    errors.add("voucher", error);
    ErrorKind::Constraints(errors).into()
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use super::*;

    fn last_unit_voucher(repo: &VouchersRepoImpl) -> Voucher {
        repo.create(NewVoucher {
            target: VoucherTarget::Shipping,
            discount: VoucherDiscount::Fixed(Amount::new(500)),
            remaining_quantity: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_decrease_quantity_floor() {
        let repo = VouchersRepoImpl::new();
        let voucher = last_unit_voucher(&repo);

        assert_eq!(repo.decrease_quantity(voucher.id).unwrap().remaining_quantity, 0);
        let err = repo.decrease_quantity(voucher.id).unwrap_err();
        match err.kind() {
            ErrorKind::Constraints(_) => {}
            kind => panic!("expected constraint violation, got {:?}", kind),
        }
    }

    #[test]
    fn test_concurrent_redemption_of_last_unit() {
        let repo = VouchersRepoImpl::new();
        let voucher = last_unit_voucher(&repo);
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let repo = repo.clone();
                let barrier = barrier.clone();
                let voucher_id = voucher.id;
                thread::spawn(move || {
                    barrier.wait();
                    repo.decrease_quantity(voucher_id).is_ok()
                })
            })
            .collect();

        let successes = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();
        assert_eq!(successes, 1);
        assert_eq!(repo.get(voucher.id).unwrap().unwrap().remaining_quantity, 0);
    }

    #[test]
    fn test_calculate_decrease() {
        let repo = VouchersRepoImpl::new();
        let shipping = Amount::new(2000);
        let items = [PricedItem {
            price: Amount::new(10000),
            discount: 0,
            quantity: 2,
        }];

        // fixed shipping voucher is capped by the shipping cost
        let capped = repo
            .create(NewVoucher {
                target: VoucherTarget::Shipping,
                discount: VoucherDiscount::Fixed(Amount::new(5000)),
                remaining_quantity: 10,
            })
            .unwrap();
        assert_eq!(repo.calculate_decrease(capped.id, &items, shipping).unwrap(), shipping);

        // 5% product voucher over a 200.00 subtotal
        let percent = repo
            .create(NewVoucher {
                target: VoucherTarget::Product,
                discount: VoucherDiscount::Percent(5),
                remaining_quantity: 10,
            })
            .unwrap();
        assert_eq!(repo.calculate_decrease(percent.id, &items, shipping).unwrap(), Amount::new(1000));
    }
}
