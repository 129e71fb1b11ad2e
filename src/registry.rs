//! Static registry of LP token contracts, RPC endpoints, and the reward
//! program's qualifying NFT. Pure configuration data; resolution logic only.

use crate::types::{Asset, Chain};

/// ERC-721 contract whose holders receive the reward boost.
pub const SPECIAL_NFT_CONTRACT: &str = "0xC88a0B7BCB32283a2B2Fc00aD3DF234eA4a8e6E5";

/// The qualifying NFT lives on Arbitrum One regardless of the chain being
/// processed.
pub const SPECIAL_NFT_CHAIN: Chain = Chain::ArbitrumOne;

/// Public JSON-RPC endpoint for a chain, used for direct contract calls.
pub fn default_rpc(chain: Chain) -> &'static str {
    match chain {
        Chain::Optimism => "https://1rpc.io/op",
        Chain::ArbitrumOne => "https://1rpc.io/arb",
        Chain::BnbChain => "https://bscrpc.com",
        Chain::Gnosis => "https://1rpc.io/gnosis",
        Chain::Polygon => "https://polygon.blockpi.network/v1/rpc/public",
        Chain::Linea => "https://linea.blockpi.network/v1/rpc/public",
        Chain::Metis => "https://andromeda.metis.io/?owner=1088",
        Chain::Base => "https://mainnet.base.org",
    }
}

/// Assets with an LP deployment on the given chain.
pub fn assets_for(chain: Chain) -> &'static [Asset] {
    match chain {
        Chain::ArbitrumOne
        | Chain::BnbChain
        | Chain::Optimism
        | Chain::Polygon
        | Chain::Gnosis => &[Asset::Usdt, Asset::Usdc, Asset::Weth, Asset::Dai],
        Chain::Linea => &[Asset::Usdt, Asset::Usdc, Asset::Weth],
        Chain::Metis => &[Asset::Usdt, Asset::Usdc, Asset::Weth, Asset::Metis],
        Chain::Base => &[],
    }
}

/// LP token contract address for an asset on a chain, or `None` when no LP
/// is deployed there.
pub fn lp_contract(chain: Chain, asset: Asset) -> Option<&'static str> {
    match (chain, asset) {
        (Chain::ArbitrumOne, Asset::Dai) => Some("0x61B3184be0c95324BF00e0DE12765B5f6Cc6b7cA"),
        (Chain::ArbitrumOne, Asset::Usdc) => Some("0xDa492C29D88FfE9B7cbfA6DC068C2f9befaE851b"),
        (Chain::ArbitrumOne, Asset::Usdt) => Some("0x45d0736D77A72AE2Bd3c5770878bd85b72895057"),
        (Chain::ArbitrumOne, Asset::Weth) => Some("0xb86AF5eB59A8e871bfA573FA656123ea86F47c3a"),

        (Chain::Optimism, Asset::Weth) => Some("0x3C12765d3cFaC132dE161BC6083C886B2Cd94934"),
        (Chain::Optimism, Asset::Dai) => Some("0xeD6d021DcA3d31D63997e4985fa6Eb3A2B745472"),
        (Chain::Optimism, Asset::Usdc) => Some("0xB12A1Be740B99D845Af98098965af761be6BD7fE"),
        (Chain::Optimism, Asset::Usdt) => Some("0x2C7FA89CC5Ea38d4e5193512b9C10808348Ba74F"),

        (Chain::BnbChain, Asset::Weth) => Some("0x223F6A3B8d087741BF99a2531DC53cd15745eBa7"),
        (Chain::BnbChain, Asset::Dai) => Some("0xf9D88D200f3D9B45Bd9f8f3ae124f59a4fbdbae5"),
        (Chain::BnbChain, Asset::Usdc) => Some("0xc170908481E928DfA39DE3D0d31bEa6292692F8e"),
        (Chain::BnbChain, Asset::Usdt) => Some("0x9350470389848979fCdFEd28352Ff9e0C9Aa87e9"),

        (Chain::Polygon, Asset::Weth) => Some("0xeF1348dAC70e8349513E4Ae7498F302e27102101"),
        (Chain::Polygon, Asset::Dai) => Some("0xe6228819A3416a256DFEF2568A75737046438cB8"),
        (Chain::Polygon, Asset::Usdc) => Some("0xa03258b76Ef13AF716370529358f6A79eb03ec12"),
        (Chain::Polygon, Asset::Usdt) => Some("0x7F7948B1345b6A95b65a001278b480CE12cA66E5"),

        (Chain::Gnosis, Asset::Weth) => Some("0x7aC5bBefAE0459F007891f9Bd245F6beaa91076c"),
        (Chain::Gnosis, Asset::Dai) => Some("0x98f7656A6C09388c646ff423ED82980675a152dD"),
        (Chain::Gnosis, Asset::Usdc) => Some("0xA639FB3f8C52e10E10a8623616484d41765d5F82"),
        (Chain::Gnosis, Asset::Usdt) => Some("0xD8a772fD2B7872230cCD92EF073bE81De87137D7"),

        (Chain::Linea, Asset::Weth) => Some("0x611C91C807c07B4D358224Fb5Dcd3999f36167B3"),
        (Chain::Linea, Asset::Usdc) => Some("0x66bE8926aa5cbDF24f07560d36999bF9B6B2Bb87"),
        (Chain::Linea, Asset::Usdt) => Some("0xFB8A9F8b13A6D297A1478aF67bDE98362BE532D6"),

        (Chain::Metis, Asset::Weth) => Some("0x5C70a3ae965cf94ee94b77E620bA425DA33EC187"),
        (Chain::Metis, Asset::Usdc) => Some("0x02e226Ed4Ab684Ba421922aa68Af68a7733deadd"),
        (Chain::Metis, Asset::Usdt) => Some("0x5f0d5D93F8F3711B5dEba819F824F37675E73Dc2"),
        (Chain::Metis, Asset::Metis) => Some("0xb0419750997c2c9f5e0C5C6d4eb89CFeFB7ca84F"),

        _ => None,
    }
}
