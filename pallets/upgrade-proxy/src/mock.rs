use crate as pallet_upgrade_proxy;
use codec::Encode;
use frame_support::{
    derive_impl,
    dispatch::DispatchResult,
    parameter_types,
    traits::{AsEnsureOriginWithArg, ConstU32, ConstU64},
    PalletId,
};
use pallet_stable_token::{CallOf, ImplementationId, LEDGER_V1};
use sp_core::H256;
use sp_runtime::{
    traits::{AccountIdConversion, BlakeTwo256, IdentityLookup},
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
        UpgradeProxy: pallet_upgrade_proxy,
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

parameter_types! {
    pub const ProxyPalletId: PalletId = PalletId(*b"prxy/led");
}

impl pallet_upgrade_proxy::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type ImplementationId = ImplementationId;
    type Logic = pallet_stable_token::Implementations<Test>;
    type PalletId = ProxyPalletId;
    type MaxInputLen = ConstU32<1024>;
    type WeightInfo = ();
}

pub const ADMIN: u64 = 50;
pub const COMPLIANCE: u64 = 1;
pub const OPERATOR: u64 = 2;
pub const ALICE: u64 = 3;
pub const BOB: u64 = 4;
pub const BURN: u64 = 9;
pub const USDT: u32 = 7;

pub fn proxy_account() -> u64 {
    ProxyPalletId::get().into_account_truncating()
}

fn build(implementation: Option<ImplementationId>) -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_balances::GenesisConfig::<Test> {
        balances: vec![(proxy_account(), 100)],
        ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();

    pallet_assets::GenesisConfig::<Test> {
        assets: vec![(USDT, COMPLIANCE, true, 1)],
        accounts: vec![(USDT, proxy_account(), 1_000)],
        ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();

    pallet_stable_token::GenesisConfig::<Test> {
        name: b"StableCoinToken".to_vec(),
        symbol: b"SCT".to_vec(),
        currency: b"HSCT".to_vec(),
        decimals: 18,
        compliance: Some(COMPLIANCE),
        operator: Some(OPERATOR),
        burn_account: Some(BURN),
        whitelist_enabled: true,
        reserve_balance: 100_000,
        whitelisted_accounts: vec![ALICE, BOB],
        initial_balances: vec![],
    }
    .assimilate_storage(&mut t)
    .unwrap();

    pallet_upgrade_proxy::GenesisConfig::<Test> { admin: Some(ADMIN), implementation }
        .assimilate_storage(&mut t)
        .unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}

// Build genesis storage with the ledger behind the dispatcher at its first logic version.
pub fn new_test_ext() -> sp_io::TestExternalities {
    build(Some(LEDGER_V1))
}

// Dispatcher deployed without any logic to forward to.
pub fn new_empty_proxy_ext() -> sp_io::TestExternalities {
    build(None)
}

pub fn input(call: CallOf<Test>) -> crate::InputOf<Test> {
    call.encode().try_into().unwrap()
}

/// Sends `call` through the dispatcher as `who`.
pub fn forward(who: u64, call: CallOf<Test>) -> DispatchResult {
    UpgradeProxy::forward(RuntimeOrigin::signed(who), input(call))
}
