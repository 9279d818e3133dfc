//! On-chain contract bindings.
//!
//! Alloy `sol!` interfaces for the contracts the bot talks to: V2-fork
//! routers (quoting via `getAmountsOut`), the V3 QuoterV2, and the pair/pool
//! `Swap` events the listener subscribes to. Event interfaces are kept
//! separate so their signature hashes can be used for log filters without
//! pulling in RPC plumbing.

use alloy::sol;

sol! {
    /// Uniswap-V2-fork router. `getAmountsOut` is the canonical quote path
    /// for constant-product pools.
    #[sol(rpc)]
    interface IUniswapV2Router02 {
        function getAmountsOut(uint256 amountIn, address[] calldata path)
            external view returns (uint256[] memory amounts);

        function swapExactTokensForTokens(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);
    }

    /// Uniswap V3 QuoterV2. Returns post-trade diagnostics alongside the
    /// output amount; only the amount feeds profitability math.
    #[sol(rpc)]
    interface IQuoterV2 {
        struct QuoteExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint256 amountIn;
            uint24 fee;
            uint160 sqrtPriceLimitX96;
        }

        function quoteExactInputSingle(QuoteExactInputSingleParams memory params)
            external
            returns (
                uint256 amountOut,
                uint160 sqrtPriceX96After,
                uint32 initializedTicksCrossed,
                uint256 gasEstimate
            );
    }

    /// V2 pair swap event (topic0 used in the log filter).
    interface IUniswapV2PairEvents {
        event Swap(
            address indexed sender,
            uint256 amount0In,
            uint256 amount1In,
            uint256 amount0Out,
            uint256 amount1Out,
            address indexed to
        );
    }

    /// V3 pool swap event (topic0 used in the log filter).
    interface IUniswapV3PoolEvents {
        event Swap(
            address indexed sender,
            address indexed recipient,
            int256 amount0,
            int256 amount1,
            uint160 sqrtPriceX96,
            uint128 liquidity,
            int24 tick
        );
    }
}
