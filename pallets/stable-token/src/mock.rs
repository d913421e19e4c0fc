use crate as pallet_stable_token;
use crate::{CallContext, CallOf, ImplementationId, Implementations, LogicRegistry, LEDGER_V1};
use codec::Encode;
use frame_support::{
    derive_impl,
    dispatch::DispatchResult,
    traits::{AsEnsureOriginWithArg, ConstU32, ConstU64},
};
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};

type Block = frame_system::mocking::MockBlock<Test>;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Balances: pallet_balances,
        Assets: pallet_assets,
        StableToken: pallet_stable_token,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type BaseCallFilter = frame_support::traits::Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type DbWeight = ();
    type RuntimeOrigin = RuntimeOrigin;
    type RuntimeCall = RuntimeCall;
    type Nonce = u64;
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
    type RuntimeEvent = RuntimeEvent;
    type BlockHashCount = ConstU64<250>;
    type Version = ();
    type PalletInfo = PalletInfo;
    type AccountData = pallet_balances::AccountData<u64>;
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ();
    type OnSetCode = ();
    type MaxConsumers = ConstU32<16>;
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
    type AccountStore = System;
}

#[derive_impl(pallet_assets::config_preludes::TestDefaultConfig)]
impl pallet_assets::Config for Test {
    type Currency = Balances;
    type CreateOrigin = AsEnsureOriginWithArg<frame_system::EnsureSigned<u64>>;
    type ForceOrigin = frame_system::EnsureRoot<u64>;
    type Freezer = ();
    type Holder = ();
}

impl pallet_stable_token::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type NativeCurrency = Balances;
    type AssetId = u32;
    type Assets = Assets;
}

pub const COMPLIANCE: u64 = 1;
pub const OPERATOR: u64 = 2;
pub const ALICE: u64 = 3;
pub const BOB: u64 = 4;
/// Never whitelisted at genesis.
pub const CHARLIE: u64 = 5;
pub const BURN: u64 = 9;
/// Account the ledger code runs as; holds stray funds.
pub const LEDGER: u64 = 100;
pub const USDT: u32 = 7;

pub const RESERVE: u128 = 100_000;

fn build(initialized: bool) -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_balances::GenesisConfig::<Test> { balances: vec![(LEDGER, 100)], ..Default::default() }
        .assimilate_storage(&mut t)
        .unwrap();

    pallet_assets::GenesisConfig::<Test> {
        assets: vec![(USDT, COMPLIANCE, true, 1)],
        accounts: vec![(USDT, LEDGER, 1_000)],
        ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();

    let token = if initialized {
        pallet_stable_token::GenesisConfig::<Test> {
            name: b"StableCoinToken".to_vec(),
            symbol: b"SCT".to_vec(),
            currency: b"HSCT".to_vec(),
            decimals: 18,
            compliance: Some(COMPLIANCE),
            operator: Some(OPERATOR),
            burn_account: Some(BURN),
            whitelist_enabled: true,
            reserve_balance: RESERVE,
            whitelisted_accounts: vec![ALICE, BOB],
            initial_balances: vec![],
        }
    } else {
        Default::default()
    };
    token.assimilate_storage(&mut t).unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}

// Build genesis storage with an initialized ledger.
pub fn new_test_ext() -> sp_io::TestExternalities {
    build(true)
}

// Genesis storage where nobody has called the initializer yet.
pub fn new_uninitialized_ext() -> sp_io::TestExternalities {
    build(false)
}

/// Runs `call` as `caller` through the given logic version.
pub fn execute_with(id: ImplementationId, caller: u64, call: CallOf<Test>) -> DispatchResult {
    let ctx = CallContext { caller, this: LEDGER };
    <Implementations<Test> as LogicRegistry<u64, ImplementationId>>::execute(&id, &ctx, &call.encode())
}

/// Runs `call` as `caller` through the initial logic version.
pub fn ledger(caller: u64, call: CallOf<Test>) -> DispatchResult {
    execute_with(LEDGER_V1, caller, call)
}
